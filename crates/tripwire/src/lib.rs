/*! Unified interface for structural invariant checking.
 *
 * One import for the analysis model, rules, verifier, entry-point scanner and reports.
 */

pub use tripwire_core as core;
pub use tripwire_emit as emit;
pub use tripwire_verify as verify;

pub use tripwire_core::{
    contract::Contract,
    function::{Function, Mutability, Visibility},
    model::{Program, ProgramModel},
    node::{CfgNode, NodeKind},
    operations::Operation,
    values::Variable,
};

pub use tripwire_emit::{ScanReportEmitter, VerificationEmitter};

pub use tripwire_verify::{
    builtin, EntryPointScanner, InvariantRule, RuleOutcome, RuleSet, Verifier, VerifyError,
};

/// Runs the built-in rule catalog against a model.
pub fn verify_builtin<M: ProgramModel + ?Sized>(model: &M) -> Vec<RuleOutcome> {
    Verifier::new().verify_all(model, &builtin::all())
}
