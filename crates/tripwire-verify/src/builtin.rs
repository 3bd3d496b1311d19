/*! Rules shipped with the verifier. */

use crate::rule::{ArgumentSpec, InvariantRule, OperandSpec, OperationPredicate};
use tripwire_core::{BinaryOp, Constant, NodeKind};

/// `OptimismPortal.depositTransaction` may only call
/// `AddressAliasHelper.applyL1ToL2Alias`, and must still contain
///
/// ```text
/// if (_isCreation) {
///     require(_to == address(0), "...");
/// }
/// ```
pub fn deposit_transaction_creation_guard() -> InvariantRule {
    InvariantRule {
        name: "deposit-transaction-creation-guard".to_string(),
        target_contract: "OptimismPortal".to_string(),
        target_function: "depositTransaction".to_string(),
        expected_calls: vec!["AddressAliasHelper.applyL1ToL2Alias".to_string()],
        guard_variable: "_isCreation".to_string(),
        child_shape: vec![NodeKind::Expression, NodeKind::BlockEnd],
        body_child: 0,
        operations: vec![
            OperationPredicate::TypeConversion {
                literal: Constant::zero(),
                target_type: "address".to_string(),
            },
            OperationPredicate::Binary {
                operator: BinaryOp::Equal,
                left: OperandSpec::Local("_to".to_string()),
                right: OperandSpec::ResultOf(0),
            },
            OperationPredicate::Call {
                signature: "require(bool,string)".to_string(),
                arguments: vec![ArgumentSpec {
                    index: 0,
                    operand: OperandSpec::ResultOf(1),
                }],
            },
        ],
    }
}

pub fn all() -> Vec<InvariantRule> {
    vec![deposit_transaction_creation_guard()]
}
