//! # compval-cli: Manifest Validation Tool
//!
//! Provides the `compval` command-line interface on top of
//! `compval-schema`.
//!
//! ## Subcommands
//!
//! - `compval validate` (alias `v`): decode a manifest stream and validate
//!   every document against its kind's schema.
//!
//! ```bash
//! compval validate --path config/carvel.yaml
//! compval -vv --config compval.yaml v -p manifests.yaml --security-context short-circuit
//! ```
//!
//! ## Exit Codes
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | every document passed |
//! | 1 | at least one constraint violation |
//! | 2 | validation could not run: unreadable input, bad configuration, or a structurally invalid document |

pub mod config;
pub mod validate;

use compval_schema::ValidationResult;

/// Every document passed.
pub const EXIT_OK: u8 = 0;

/// At least one constraint violation was found.
pub const EXIT_VIOLATIONS: u8 = 1;

/// Validation could not run.
pub const EXIT_ERROR: u8 = 2;

/// Map a batch result to the process exit code.
pub fn exit_code(result: &ValidationResult) -> u8 {
    if !result.failures().is_empty() {
        EXIT_ERROR
    } else if result.violation_count() > 0 {
        EXIT_VIOLATIONS
    } else {
        EXIT_OK
    }
}
