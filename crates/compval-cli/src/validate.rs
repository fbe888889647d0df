//! # Validate Subcommand
//!
//! Reads a manifest file, decodes every document in it, validates the
//! batch and reports. Each diagnostic is logged at `error` level; a one-line
//! summary goes to stdout, listing any kinds that have no schema.
//!
//! Returns exit code: 0 on success, 1 on violations, 2 when validation
//! could not run (see [`crate::exit_code`]).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use compval_core::load_documents;
use compval_schema::{SchemaPolicy, SecurityContextMode, ValidationResult};

use crate::config::ValidatorConfig;

/// Manifest validated when `--path` is not given.
pub const DEFAULT_MANIFEST_PATH: &str = "config/carvel.yaml";

/// Arguments for the `compval validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// The path to the component config to validate.
    #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
    pub path: PathBuf,

    /// Reject component names containing the word "component".
    #[arg(long)]
    pub forbid_component_in_name: bool,

    /// Whether a failed security-context check hides the later ones.
    #[arg(long, value_enum, value_name = "MODE")]
    pub security_context: Option<SecurityContextArg>,
}

/// `--security-context` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SecurityContextArg {
    Independent,
    ShortCircuit,
}

impl From<SecurityContextArg> for SecurityContextMode {
    fn from(arg: SecurityContextArg) -> Self {
        match arg {
            SecurityContextArg::Independent => SecurityContextMode::Independent,
            SecurityContextArg::ShortCircuit => SecurityContextMode::ShortCircuit,
        }
    }
}

impl ValidateArgs {
    /// Apply command-line overrides on top of the configured policy.
    fn apply(&self, policy: &mut SchemaPolicy) {
        if self.forbid_component_in_name {
            policy.forbid_component_in_name = true;
        }
        if let Some(mode) = self.security_context {
            policy.security_context = mode.into();
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &ValidatorConfig) -> Result<u8> {
    let mut config = config.clone();
    args.apply(&mut config.policy);
    tracing::debug!(policy = ?config.policy, "effective schema policy");

    let validator = config.build_validator()?;
    let documents = load_documents(&args.path)
        .with_context(|| format!("cannot validate {}", args.path.display()))?;
    tracing::info!(
        path = %args.path.display(),
        documents = documents.len(),
        "decoded manifest"
    );

    let result = validator.validate_batch(&documents);
    report(&args.path.display().to_string(), &result);
    Ok(crate::exit_code(&result))
}

fn report(path: &str, result: &ValidationResult) {
    for message in result.messages() {
        tracing::error!("{message}");
    }
    println!("{}", summary(path, result));
}

/// One-line outcome for stdout, naming any kinds that were not validated.
fn summary(path: &str, result: &ValidationResult) -> String {
    let mut line = if result.is_pass() {
        format!("OK: {path} ({} document(s))", result.document_count())
    } else {
        format!(
            "FAIL: {path} ({} violation(s), {} invalid document(s) out of {})",
            result.violation_count(),
            result.failures().len(),
            result.document_count()
        )
    };
    let mut skipped: Vec<&str> = Vec::new();
    for kind in result.unrecognized_kinds() {
        if !skipped.contains(&kind.as_str()) {
            skipped.push(kind);
        }
    }
    if !skipped.is_empty() {
        line.push_str(&format!("; no validation specified for {}", skipped.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EXIT_ERROR, EXIT_OK, EXIT_VIOLATIONS};

    const VALID_PIPELINE: &str = "apiVersion: tekton.dev/v1\nkind: Pipeline\nmetadata:\n  name: my-pipeline\n";

    fn args(path: PathBuf) -> ValidateArgs {
        ValidateArgs {
            path,
            forbid_component_in_name: false,
            security_context: None,
        }
    }

    fn run_on(content: &str, mut configure: impl FnMut(&mut ValidateArgs)) -> Result<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carvel.yaml");
        std::fs::write(&path, content).unwrap();
        let mut args = args(path);
        configure(&mut args);
        run_validate(&args, &ValidatorConfig::default())
    }

    #[test]
    fn test_valid_manifest_exits_ok() {
        assert_eq!(run_on(VALID_PIPELINE, |_| {}).unwrap(), EXIT_OK);
    }

    #[test]
    fn test_violations_exit_one() {
        let content = VALID_PIPELINE.replace("my-pipeline", "myPipeline");
        assert_eq!(run_on(&content, |_| {}).unwrap(), EXIT_VIOLATIONS);
    }

    #[test]
    fn test_structural_failure_exits_two() {
        let content = format!("{VALID_PIPELINE}---\nkind: Pipeline\n");
        assert_eq!(run_on(&content, |_| {}).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_unrecognized_kind_exits_ok() {
        let content = format!("{VALID_PIPELINE}---\napiVersion: v1\nkind: ConfigMap\n");
        assert_eq!(run_on(&content, |_| {}).unwrap(), EXIT_OK);
    }

    #[test]
    fn test_summary_names_unrecognized_kinds_once() {
        let documents = compval_core::decode_documents(
            &format!(
                "{VALID_PIPELINE}---\napiVersion: v1\nkind: ConfigMap\n---\napiVersion: v1\nkind: Secret\n---\napiVersion: v1\nkind: ConfigMap\n"
            ),
            "inline",
        )
        .unwrap();
        let validator = ValidatorConfig::default().build_validator().unwrap();
        let result = validator.validate_batch(&documents);
        assert_eq!(
            summary("carvel.yaml", &result),
            "OK: carvel.yaml (4 document(s)); no validation specified for ConfigMap, Secret"
        );
    }

    #[test]
    fn test_summary_without_unrecognized_kinds() {
        let documents = compval_core::decode_documents(VALID_PIPELINE, "inline").unwrap();
        let validator = ValidatorConfig::default().build_validator().unwrap();
        let result = validator.validate_batch(&documents);
        assert_eq!(summary("carvel.yaml", &result), "OK: carvel.yaml (1 document(s))");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_validate(&args(dir.path().join("absent.yaml")), &ValidatorConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("cannot validate"), "{err:#}");
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        assert!(run_on("kind: [unclosed\n", |_| {}).is_err());
    }

    #[test]
    fn test_forbid_component_flag() {
        let component = "apiVersion: supply-chain.apps.tanzu.vmware.com/v1alpha1
kind: Component
metadata:
  name: my-component-1.0.0
  labels:
    supply-chain.apps.tanzu.vmware.com/catalog: tanzu
spec:
  description: builds things
  pipelineRun:
    pipelineRef:
      name: a-pipeline
";
        assert_eq!(run_on(component, |_| {}).unwrap(), EXIT_OK);
        assert_eq!(
            run_on(component, |a| a.forbid_component_in_name = true).unwrap(),
            EXIT_VIOLATIONS
        );
    }

    #[test]
    fn test_flags_override_config_policy() {
        let mut policy = SchemaPolicy::default();
        let mut overrides = args(PathBuf::from(DEFAULT_MANIFEST_PATH));
        overrides.security_context = Some(SecurityContextArg::ShortCircuit);
        overrides.apply(&mut policy);
        assert_eq!(policy.security_context, SecurityContextMode::ShortCircuit);
        assert!(!policy.forbid_component_in_name);

        // An unset flag keeps the configured value.
        let mut policy = SchemaPolicy {
            forbid_component_in_name: true,
            security_context: SecurityContextMode::ShortCircuit,
        };
        args(PathBuf::from(DEFAULT_MANIFEST_PATH)).apply(&mut policy);
        assert!(policy.forbid_component_in_name);
        assert_eq!(policy.security_context, SecurityContextMode::ShortCircuit);
    }
}
