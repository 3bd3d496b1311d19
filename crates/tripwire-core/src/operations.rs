use crate::values::VarId;
use serde::{Deserialize, Serialize};

/// One lowered IR operation attached to a CFG node.
///
/// The set of kinds is closed. Code inspecting operations matches on this
/// enum exhaustively so a new kind has to be handled explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Condition {
        value: VarId,
    },
    TypeConversion {
        source: VarId,
        target_type: String,
        result: VarId,
    },
    Binary {
        operator: BinaryOp,
        left: VarId,
        right: VarId,
        result: VarId,
    },
    Call {
        callee: String,
        #[serde(default)]
        arguments: Vec<VarId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<VarId>,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Condition { .. } => OperationKind::Condition,
            Operation::TypeConversion { .. } => OperationKind::TypeConversion,
            Operation::Binary { .. } => OperationKind::Binary,
            Operation::Call { .. } => OperationKind::Call,
        }
    }

    pub fn result(&self) -> Option<VarId> {
        match self {
            Operation::Condition { .. } => None,
            Operation::TypeConversion { result, .. } | Operation::Binary { result, .. } => {
                Some(*result)
            }
            Operation::Call { result, .. } => *result,
        }
    }

    pub fn operands(&self) -> Vec<VarId> {
        match self {
            Operation::Condition { value } => vec![*value],
            Operation::TypeConversion { source, .. } => vec![*source],
            Operation::Binary { left, right, .. } => vec![*left, *right],
            Operation::Call { arguments, .. } => arguments.clone(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Condition { value } => write!(f, "CONDITION {}", value),
            Operation::TypeConversion {
                source,
                target_type,
                result,
            } => write!(f, "{} = CONVERT {} to {}", result, source, target_type),
            Operation::Binary {
                operator,
                left,
                right,
                result,
            } => write!(f, "{} = {} {} {}", result, left, operator, right),
            Operation::Call {
                callee,
                arguments,
                result,
            } => {
                let args = arguments
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                match result {
                    Some(result) => write!(f, "{} = CALL {}({})", result, callee, args),
                    None => write!(f, "CALL {}({})", callee, args),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Condition,
    TypeConversion,
    Binary,
    Call,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::Condition => "condition",
            OperationKind::TypeConversion => "type conversion",
            OperationKind::Binary => "binary",
            OperationKind::Call => "call",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_exposure() {
        let cond = Operation::Condition { value: VarId(0) };
        assert_eq!(cond.result(), None);

        let call = Operation::Call {
            callee: "require(bool,string)".to_string(),
            arguments: vec![VarId(3)],
            result: None,
        };
        assert_eq!(call.result(), None);
        assert_eq!(call.operands(), vec![VarId(3)]);

        let bin = Operation::Binary {
            operator: BinaryOp::Equal,
            left: VarId(1),
            right: VarId(2),
            result: VarId(3),
        };
        assert_eq!(bin.result(), Some(VarId(3)));
        assert_eq!(bin.to_string(), "%3 = %1 == %2");
    }

    #[test]
    fn test_operation_json_shape() {
        let json = r#"{"op": "type_conversion", "source": 0, "target_type": "address", "result": 1}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.kind(), OperationKind::TypeConversion);
        assert_eq!(op.result(), Some(VarId(1)));
    }
}
