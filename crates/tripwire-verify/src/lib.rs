/*! Guard security invariants against silent refactors.
 *
 * A refactor can keep every test green while dropping the one `require` that made a code path
 * safe, or quietly add an external call. Rules here pin down both: the exact multiset of
 * high-level calls a function makes, and the exact guarded block that must still exist in its
 * CFG. The same crate also lists fuzz property tests found by naming convention.
 */

pub mod builtin;
pub mod pattern;
pub mod rule;
pub mod scanner;
pub mod verifier;

pub use pattern::{matches, MatchReport, NearMiss, OperationMismatch, PatternMatcher, Rejection};
pub use rule::{ArgumentSpec, InvariantRule, OperandSpec, OperationPredicate, RuleSet};
pub use scanner::{EntryPointScanner, FuzzContract, ScanConfig};
pub use verifier::{Ambiguity, Pass, RuleOutcome, Verifier, Violation};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid rule {rule}: {reason}")]
    Invalid { rule: String, reason: String },
    #[error("Cannot read rules from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed rules in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Cannot walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Contract,
    Function,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Contract => f.write_str("contract"),
            TargetKind::Function => f.write_str("function"),
        }
    }
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: TargetKind, name: String },
    #[error("Invariant violated: {0}")]
    InvariantViolation(Violation),
    #[error(transparent)]
    InvalidRule(#[from] RuleError),
    #[error("Unsupported model accessor version {found} (expected {expected})")]
    UnsupportedModelVersion { found: u32, expected: u32 },
}

impl VerifyError {
    pub fn contract_not_found(name: &str) -> Self {
        VerifyError::NotFound {
            kind: TargetKind::Contract,
            name: name.to_string(),
        }
    }

    pub fn function_not_found(name: &str) -> Self {
        VerifyError::NotFound {
            kind: TargetKind::Function,
            name: name.to_string(),
        }
    }

    /// Short name of the sub-check that failed.
    pub fn check_name(&self) -> &'static str {
        match self {
            VerifyError::NotFound {
                kind: TargetKind::Contract,
                ..
            } => "contract",
            VerifyError::NotFound {
                kind: TargetKind::Function,
                ..
            } => "function",
            VerifyError::InvariantViolation(violation) => violation.check_name(),
            VerifyError::InvalidRule(_) => "rule",
            VerifyError::UnsupportedModelVersion { .. } => "model-version",
        }
    }
}

pub type VerifyResult<T> = std::result::Result<T, VerifyError>;
