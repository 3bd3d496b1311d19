mod common;

use common::{deposit_transaction, RequireArg, Shape};
use pretty_assertions::assert_eq;
use tripwire_core::{BinaryOp, Constant, FunctionBuilder, NodeKind, OperationKind};
use tripwire_verify::{
    builtin, matches, OperandSpec, OperationMismatch, PatternMatcher, Rejection,
};

#[test]
fn test_guarded_block_matches() {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(&Shape::default());
    assert!(matches(&function, &rule));
}

#[test]
fn test_no_conditional_nodes_is_plain_false() {
    let rule = builtin::deposit_transaction_creation_guard();
    let mut f = FunctionBuilder::new("depositTransaction");
    let body = f.node(NodeKind::Expression);
    let x = f.local("x");
    f.call_void(body, "require(bool,string)", vec![x]);
    let function = f.build().unwrap();

    let report = PatternMatcher::new(&rule).explain(&function);
    assert!(!matches(&function, &rule));
    assert_eq!(report.candidates, 0);
    assert!(report.near_misses.is_empty());
}

#[test]
fn test_extra_operation_rejects_node() {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(&Shape {
        extra_operation: true,
        ..Shape::default()
    });

    assert!(!matches(&function, &rule));
    let report = PatternMatcher::new(&rule).explain(&function);
    assert!(report.near_misses.iter().any(|miss| miss.rejection
        == Rejection::OperationCount {
            expected: 3,
            found: 4
        }));
}

#[test]
fn test_guard_name_is_case_sensitive() {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(&Shape {
        guard: "_IsCreation",
        ..Shape::default()
    });

    assert!(!matches(&function, &rule));
    let report = PatternMatcher::new(&rule).explain(&function);
    assert!(report.near_misses.iter().any(|miss| miss.rejection
        == Rejection::GuardNameMismatch {
            expected: "_isCreation".to_string(),
            found: "_IsCreation".to_string(),
        }));
}

#[test]
fn test_look_alike_zero_does_not_satisfy_cross_reference() {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(&Shape {
        compare_against_foreign_zero: true,
        ..Shape::default()
    });

    assert!(!matches(&function, &rule));
    let report = PatternMatcher::new(&rule).explain(&function);
    let rejection = report
        .near_misses
        .iter()
        .map(|miss| &miss.rejection)
        .find(|r| matches!(r, Rejection::Operation { .. }))
        .expect("guard node should reach operation matching");
    match rejection {
        Rejection::Operation {
            position,
            mismatch: OperationMismatch::Operand { slot, expected, .. },
        } => {
            assert_eq!(*position, 1);
            assert_eq!(slot, "right operand");
            assert_eq!(*expected, OperandSpec::ResultOf(0));
        }
        other => panic!("Expected operand mismatch, got {:?}", other),
    }
}

#[test]
fn test_not_equal_operator_rejected() {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(&Shape {
        operator: BinaryOp::NotEqual,
        ..Shape::default()
    });
    assert!(!matches(&function, &rule));
}

#[test]
fn test_result_independent_of_node_order() {
    let rule = builtin::deposit_transaction_creation_guard();
    for decoy_first in [false, true] {
        let mut function = deposit_transaction(&Shape {
            decoy_first,
            ..Shape::default()
        });
        assert!(matches(&function, &rule));
        function.nodes.reverse();
        assert!(matches(&function, &rule));
    }
}

#[test]
fn test_near_misses_recorded_per_candidate() {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(&Shape {
        operator: BinaryOp::NotEqual,
        decoy_first: true,
        ..Shape::default()
    });

    let report = PatternMatcher::new(&rule).explain(&function);
    assert_eq!(report.matched, None);
    assert_eq!(report.candidates, 2);
    assert_eq!(report.near_misses.len(), 2);
    assert!(matches!(
        report.near_misses[0].rejection,
        Rejection::GuardNameMismatch { .. }
    ));
    assert_eq!(
        report.near_misses[1].rejection,
        Rejection::Operation {
            position: 1,
            mismatch: OperationMismatch::Operator {
                expected: BinaryOp::Equal,
                found: BinaryOp::NotEqual,
            },
        }
    );
}

#[test]
fn test_child_shape_must_match_exactly() {
    let rule = builtin::deposit_transaction_creation_guard();
    let mut f = FunctionBuilder::new("depositTransaction");
    let flag = f.local("_isCreation");
    let guard = f.node(NodeKind::Conditional);
    f.condition(guard, flag);
    let end = f.node(NodeKind::BlockEnd);
    let body = f.node(NodeKind::Expression);
    f.link(guard, end).link(guard, body);
    let function = f.build().unwrap();

    let report = PatternMatcher::new(&rule).explain(&function);
    assert_eq!(
        report.near_misses[0].rejection,
        Rejection::ChildKind {
            position: 0,
            expected: NodeKind::Expression,
            found: NodeKind::BlockEnd,
        }
    );
}

#[test]
fn test_guard_must_be_named_local() {
    let rule = builtin::deposit_transaction_creation_guard();
    let mut f = FunctionBuilder::new("depositTransaction");
    let guard = f.node(NodeKind::Conditional);
    let flag = f.temporary();
    f.condition(guard, flag);
    let function = f.build().unwrap();

    let report = PatternMatcher::new(&rule).explain(&function);
    assert!(matches!(
        report.near_misses[0].rejection,
        Rejection::GuardNotLocal { .. }
    ));
}

/// The rejection recorded for the `_isCreation` node, which always gets past
/// the guard and child checks in these fixtures.
fn guarded_block_rejection(shape: &Shape) -> Rejection {
    let rule = builtin::deposit_transaction_creation_guard();
    let function = deposit_transaction(shape);
    assert!(!matches(&function, &rule));

    PatternMatcher::new(&rule)
        .explain(&function)
        .near_misses
        .into_iter()
        .map(|miss| miss.rejection)
        .find(|r| matches!(r, Rejection::Operation { .. }))
        .expect("guard node should reach operation matching")
}

#[test]
fn test_conversion_of_non_zero_literal_rejected() {
    let rejection = guarded_block_rejection(&Shape {
        literal: 1,
        ..Shape::default()
    });
    assert_eq!(
        rejection,
        Rejection::Operation {
            position: 0,
            mismatch: OperationMismatch::SourceLiteral {
                expected: Constant::zero(),
                found: "1".to_string(),
            },
        }
    );
    assert_eq!(
        rejection.to_string(),
        "operation 0: converts `1`, expected literal 0"
    );
}

#[test]
fn test_conversion_target_type_rejected() {
    let rejection = guarded_block_rejection(&Shape {
        target_type: "uint256",
        ..Shape::default()
    });
    assert_eq!(
        rejection,
        Rejection::Operation {
            position: 0,
            mismatch: OperationMismatch::TargetType {
                expected: "address".to_string(),
                found: "uint256".to_string(),
            },
        }
    );
}

#[test]
fn test_operation_kind_rejected() {
    let rejection = guarded_block_rejection(&Shape {
        binary_instead_of_conversion: true,
        ..Shape::default()
    });
    assert_eq!(
        rejection,
        Rejection::Operation {
            position: 0,
            mismatch: OperationMismatch::Kind {
                expected: OperationKind::TypeConversion,
                found: OperationKind::Binary,
            },
        }
    );
}

#[test]
fn test_require_signature_rejected() {
    let rejection = guarded_block_rejection(&Shape {
        require_signature: "require(bool)",
        ..Shape::default()
    });
    assert_eq!(
        rejection,
        Rejection::Operation {
            position: 2,
            mismatch: OperationMismatch::Signature {
                expected: "require(bool,string)".to_string(),
                found: "require(bool)".to_string(),
            },
        }
    );
}

#[test]
fn test_require_must_take_comparison_result() {
    let rejection = guarded_block_rejection(&Shape {
        require_arg: RequireArg::Local("_ok"),
        ..Shape::default()
    });
    assert_eq!(
        rejection,
        Rejection::Operation {
            position: 2,
            mismatch: OperationMismatch::Operand {
                slot: "argument 0".to_string(),
                expected: OperandSpec::ResultOf(1),
                found: "_ok".to_string(),
            },
        }
    );
}

#[test]
fn test_require_without_arguments_rejected() {
    let rejection = guarded_block_rejection(&Shape {
        require_arg: RequireArg::Nothing,
        ..Shape::default()
    });
    assert_eq!(
        rejection,
        Rejection::Operation {
            position: 2,
            mismatch: OperationMismatch::MissingArgument { index: 0 },
        }
    );
}
