/*! Match a rule's guarded-block shape against a function's CFG.
 *
 * Every conditional node is a candidate. A candidate matches only if it branches on the rule's
 * guard local, its children have exactly the expected kinds, and the designated expression child
 * carries exactly the expected operations in order. Extra or missing operations reject the node;
 * a subsequence is not enough. Cross-references between operations compare variable ids, never
 * values, so a look-alike temporary produced elsewhere does not satisfy them.
 */

use crate::rule::{InvariantRule, OperandSpec, OperationPredicate};
use serde::Serialize;
use tracing::debug;
use tripwire_core::{
    BinaryOp, CfgNode, Constant, Function, NodeId, NodeKind, Operation, OperationKind, VarId,
    Variable,
};

pub struct PatternMatcher<'r> {
    rule: &'r InvariantRule,
}

/// Outcome of trying every candidate node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub matched: Option<NodeId>,
    /// Conditional nodes seen before a match was found (all of them on failure).
    pub candidates: usize,
    pub near_misses: Vec<NearMiss>,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearMiss {
    pub node: NodeId,
    pub rejection: Rejection,
}

impl std::fmt::Display for NearMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.node, self.rejection)
    }
}

/// First sub-check a candidate node failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    NoOperations,
    NotACondition {
        found: OperationKind,
    },
    GuardNotLocal {
        found: String,
    },
    GuardNameMismatch {
        expected: String,
        found: String,
    },
    UnresolvedVariable {
        var: VarId,
    },
    ChildCount {
        expected: usize,
        found: usize,
    },
    MissingChild {
        child: NodeId,
    },
    ChildKind {
        position: usize,
        expected: NodeKind,
        found: NodeKind,
    },
    OperationCount {
        expected: usize,
        found: usize,
    },
    Operation {
        position: usize,
        mismatch: OperationMismatch,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NoOperations => write!(f, "conditional node has no IR"),
            Rejection::NotACondition { found } => {
                write!(f, "first IR is a {}, not a condition", found)
            }
            Rejection::GuardNotLocal { found } => {
                write!(f, "condition tests `{}`, not a named local", found)
            }
            Rejection::GuardNameMismatch { expected, found } => {
                write!(f, "condition tests `{}`, expected `{}`", found, expected)
            }
            Rejection::UnresolvedVariable { var } => write!(f, "variable {} does not resolve", var),
            Rejection::ChildCount { expected, found } => {
                write!(f, "{} children, expected {}", found, expected)
            }
            Rejection::MissingChild { child } => write!(f, "child {} does not resolve", child),
            Rejection::ChildKind {
                position,
                expected,
                found,
            } => write!(f, "child {} is {}, expected {}", position, found, expected),
            Rejection::OperationCount { expected, found } => {
                write!(f, "guarded block has {} operations, expected {}", found, expected)
            }
            Rejection::Operation { position, mismatch } => {
                write!(f, "operation {}: {}", position, mismatch)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mismatch", rename_all = "snake_case")]
pub enum OperationMismatch {
    Kind {
        expected: OperationKind,
        found: OperationKind,
    },
    SourceLiteral {
        expected: Constant,
        found: String,
    },
    TargetType {
        expected: String,
        found: String,
    },
    Operator {
        expected: BinaryOp,
        found: BinaryOp,
    },
    Operand {
        slot: String,
        expected: OperandSpec,
        found: String,
    },
    Signature {
        expected: String,
        found: String,
    },
    MissingArgument {
        index: usize,
    },
}

impl std::fmt::Display for OperationMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationMismatch::Kind { expected, found } => {
                write!(f, "found {}, expected {}", found, expected)
            }
            OperationMismatch::SourceLiteral { expected, found } => {
                write!(f, "converts `{}`, expected literal {}", found, expected)
            }
            OperationMismatch::TargetType { expected, found } => {
                write!(f, "converts to {}, expected {}", found, expected)
            }
            OperationMismatch::Operator { expected, found } => {
                write!(f, "operator {}, expected {}", found, expected)
            }
            OperationMismatch::Operand {
                slot,
                expected,
                found,
            } => write!(f, "{} is `{}`, expected {}", slot, found, expected),
            OperationMismatch::Signature { expected, found } => {
                write!(f, "calls {}, expected {}", found, expected)
            }
            OperationMismatch::MissingArgument { index } => {
                write!(f, "no argument at index {}", index)
            }
        }
    }
}

/// Shorthand for `PatternMatcher::new(rule).matches(function)`.
pub fn matches(function: &Function, rule: &InvariantRule) -> bool {
    PatternMatcher::new(rule).matches(function)
}

impl<'r> PatternMatcher<'r> {
    pub fn new(rule: &'r InvariantRule) -> Self {
        Self { rule }
    }

    /// True as soon as one conditional node fully matches. A function without
    /// conditional nodes is a plain `false`.
    pub fn matches(&self, function: &Function) -> bool {
        function
            .nodes()
            .filter(|node| node.is_conditional())
            .any(|node| self.match_candidate(function, node).is_ok())
    }

    /// Like [`matches`](Self::matches) but records why each rejected candidate
    /// failed.
    pub fn explain(&self, function: &Function) -> MatchReport {
        let mut report = MatchReport::default();

        for node in function.nodes().filter(|node| node.is_conditional()) {
            report.candidates += 1;
            match self.match_candidate(function, node) {
                Ok(()) => {
                    debug!(rule = %self.rule.name, node = %node.id, "structural pattern matched");
                    report.matched = Some(node.id);
                    break;
                }
                Err(rejection) => {
                    debug!(
                        rule = %self.rule.name,
                        node = %node.id,
                        %rejection,
                        "candidate rejected"
                    );
                    report.near_misses.push(NearMiss {
                        node: node.id,
                        rejection,
                    });
                }
            }
        }

        report
    }

    fn match_candidate(&self, function: &Function, node: &CfgNode) -> Result<(), Rejection> {
        self.check_guard(function, node)?;
        let body = self.check_children(function, node)?;
        self.check_operations(function, body)
    }

    fn check_guard(&self, function: &Function, node: &CfgNode) -> Result<(), Rejection> {
        let value = match node.first_operation() {
            None => return Err(Rejection::NoOperations),
            Some(Operation::Condition { value }) => *value,
            Some(other) => {
                return Err(Rejection::NotACondition {
                    found: other.kind(),
                })
            }
        };

        let var = function
            .variable(value)
            .ok_or(Rejection::UnresolvedVariable { var: value })?;
        match var.local_name() {
            Some(name) if name == self.rule.guard_variable => Ok(()),
            Some(name) => Err(Rejection::GuardNameMismatch {
                expected: self.rule.guard_variable.clone(),
                found: name.to_string(),
            }),
            None => Err(Rejection::GuardNotLocal {
                found: var.to_string(),
            }),
        }
    }

    /// Returns the designated expression child.
    fn check_children<'f>(
        &self,
        function: &'f Function,
        node: &CfgNode,
    ) -> Result<&'f CfgNode, Rejection> {
        let shape = &self.rule.child_shape;
        if node.children.len() != shape.len() {
            return Err(Rejection::ChildCount {
                expected: shape.len(),
                found: node.children.len(),
            });
        }

        let mut children = Vec::with_capacity(shape.len());
        for (position, (&child_id, &expected)) in node.children.iter().zip(shape).enumerate() {
            let child = function
                .node(child_id)
                .ok_or(Rejection::MissingChild { child: child_id })?;
            if child.kind != expected {
                return Err(Rejection::ChildKind {
                    position,
                    expected,
                    found: child.kind,
                });
            }
            children.push(child);
        }

        children
            .get(self.rule.body_child)
            .copied()
            .ok_or(Rejection::ChildCount {
                expected: shape.len(),
                found: node.children.len(),
            })
    }

    fn check_operations(&self, function: &Function, body: &CfgNode) -> Result<(), Rejection> {
        let expected = &self.rule.operations;
        if body.operations.len() != expected.len() {
            return Err(Rejection::OperationCount {
                expected: expected.len(),
                found: body.operations.len(),
            });
        }

        let mut results: Vec<Option<VarId>> = Vec::with_capacity(expected.len());
        for (position, (op, predicate)) in body.operations.iter().zip(expected).enumerate() {
            OperationCheck {
                function,
                results: &results,
            }
            .check(op, predicate)
            .map_err(|mismatch| Rejection::Operation { position, mismatch })?;
            results.push(op.result());
        }

        Ok(())
    }
}

/// Checks one operation against its predicate given the results produced by
/// the positions before it.
struct OperationCheck<'a> {
    function: &'a Function,
    results: &'a [Option<VarId>],
}

impl OperationCheck<'_> {
    fn check(&self, op: &Operation, predicate: &OperationPredicate) -> Result<(), OperationMismatch> {
        match (predicate, op) {
            (OperationPredicate::Condition { value: spec }, Operation::Condition { value }) => {
                self.operand("condition", *value, spec)
            }
            (
                OperationPredicate::TypeConversion {
                    literal,
                    target_type,
                },
                Operation::TypeConversion {
                    source,
                    target_type: found_type,
                    ..
                },
            ) => {
                let source_var = self.function.variable(*source);
                if source_var.and_then(Variable::as_literal) != Some(literal) {
                    return Err(OperationMismatch::SourceLiteral {
                        expected: literal.clone(),
                        found: self.describe(*source),
                    });
                }
                if found_type != target_type {
                    return Err(OperationMismatch::TargetType {
                        expected: target_type.clone(),
                        found: found_type.clone(),
                    });
                }
                Ok(())
            }
            (
                OperationPredicate::Binary {
                    operator,
                    left,
                    right,
                },
                Operation::Binary {
                    operator: found_op,
                    left: found_left,
                    right: found_right,
                    ..
                },
            ) => {
                if found_op != operator {
                    return Err(OperationMismatch::Operator {
                        expected: *operator,
                        found: *found_op,
                    });
                }
                self.operand("left operand", *found_left, left)?;
                self.operand("right operand", *found_right, right)
            }
            (
                OperationPredicate::Call {
                    signature,
                    arguments,
                },
                Operation::Call {
                    callee,
                    arguments: found_args,
                    ..
                },
            ) => {
                if callee != signature {
                    return Err(OperationMismatch::Signature {
                        expected: signature.clone(),
                        found: callee.clone(),
                    });
                }
                for arg in arguments {
                    let var = found_args
                        .get(arg.index)
                        .ok_or(OperationMismatch::MissingArgument { index: arg.index })?;
                    self.operand(&format!("argument {}", arg.index), *var, &arg.operand)?;
                }
                Ok(())
            }
            (predicate, op) => Err(OperationMismatch::Kind {
                expected: predicate.kind(),
                found: op.kind(),
            }),
        }
    }

    fn operand(&self, slot: &str, var: VarId, spec: &OperandSpec) -> Result<(), OperationMismatch> {
        let ok = match spec {
            OperandSpec::ResultOf(position) => {
                self.results.get(*position).copied().flatten() == Some(var)
            }
            OperandSpec::Local(name) => {
                self.function.variable(var).and_then(Variable::local_name) == Some(name.as_str())
            }
            OperandSpec::Literal(value) => {
                self.function.variable(var).and_then(Variable::as_literal) == Some(value)
            }
            OperandSpec::Any => self.function.variable(var).is_some(),
        };

        if ok {
            Ok(())
        } else {
            Err(OperationMismatch::Operand {
                slot: slot.to_string(),
                expected: spec.clone(),
                found: self.describe(var),
            })
        }
    }

    fn describe(&self, var: VarId) -> String {
        match self.function.variable(var) {
            Some(Variable::Temporary { .. }) => format!("temporary {}", var),
            Some(other) => other.to_string(),
            None => format!("unresolved {}", var),
        }
    }
}
