//! Integration test: run the `compval` binary against manifest files and
//! check exit codes and the stdout summary.

use std::path::Path;
use std::process::{Command, Output};

const VALID_TASK: &str = "apiVersion: tekton.dev/v1
kind: Task
metadata:
  name: my-task
spec:
  params:
  - name: git-url
  stepTemplate:
    securityContext:
      allowPrivilegeEscalation: false
      capabilities:
        drop: [ALL]
      runAsNonRoot: true
      runAsUser: 1001
      seccompProfile:
        type: RuntimeDefault
";

fn compval(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compval"))
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .expect("compval binary runs")
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_default_path_is_config_carvel_yaml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("config")).unwrap();
    write(&dir.path().join("config"), "carvel.yaml", VALID_TASK);

    let output = compval(dir.path(), &["validate"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("OK: config/carvel.yaml"), "{stdout}");
}

#[test]
fn test_alias_and_violations() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.yaml", &VALID_TASK.replace("git-url", "gitUrl"));

    let output = compval(dir.path(), &["v", "-p", "bad.yaml"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Task/my-task Key 'spec.params[0].name': gitUrl does not appear to be in kebab-case"),
        "{stderr}"
    );
}

#[test]
fn test_missing_manifest_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = compval(dir.path(), &["validate", "--path", "nowhere.yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_file_and_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let insecure = VALID_TASK
        .replace("runAsNonRoot: true", "runAsNonRoot: false")
        .replace("runAsUser: 1001", "runAsUser: 0");
    write(dir.path(), "task.yaml", &insecure);
    write(
        dir.path(),
        "compval.yaml",
        "policy:\n  security_context: short-circuit\ntemplates:\n  equals: \"Key '{field}': wanted {param}, got {observed}\"\n",
    );

    let output = compval(dir.path(), &["--config", "compval.yaml", "validate", "-p", "task.yaml"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("runAsNonRoot': wanted true, got false"), "{stderr}");
    assert!(!stderr.contains("runAsUser"), "{stderr}");

    let output = compval(
        dir.path(),
        &[
            "--config",
            "compval.yaml",
            "validate",
            "-p",
            "task.yaml",
            "--security-context",
            "independent",
        ],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("runAsUser"), "{stderr}");
}

#[test]
fn test_invalid_config_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "task.yaml", VALID_TASK);
    write(dir.path(), "compval.yaml", "policy:\n  security_context: sometimes\n");

    let output = compval(dir.path(), &["--config", "compval.yaml", "validate", "-p", "task.yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unrecognized_kind_is_reported_without_verbosity() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "mixed.yaml",
        &format!("{VALID_TASK}---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n"),
    );

    let output = compval(dir.path(), &["validate", "-p", "mixed.yaml"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no validation specified for ConfigMap"), "{stdout}");
}
