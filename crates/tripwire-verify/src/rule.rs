/*! Declarative invariant rules.
 *
 * A rule names a target function, the exact multiset of high-level calls it may make, and the
 * shape of one guarded block: the guard local, the kinds of the guard's children, and the exact
 * operation sequence of the designated expression child. Rules are plain configuration and load
 * from JSON.
 */

use crate::{RuleError, RuleResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tripwire_core::{BinaryOp, Constant, NodeKind, OperationKind};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantRule {
    pub name: String,
    pub target_contract: String,
    pub target_function: String,
    /// `Contract.function` entries; order is irrelevant, counts are not.
    #[serde(default)]
    pub expected_calls: Vec<String>,
    pub guard_variable: String,
    pub child_shape: Vec<NodeKind>,
    /// Position in `child_shape` of the child whose operations are checked.
    #[serde(default)]
    pub body_child: usize,
    pub operations: Vec<OperationPredicate>,
}

impl InvariantRule {
    pub fn target(&self) -> String {
        format!("{}.{}", self.target_contract, self.target_function)
    }

    pub fn sorted_expected_calls(&self) -> Vec<String> {
        let mut calls = self.expected_calls.clone();
        calls.sort();
        calls
    }

    pub fn validate(&self) -> RuleResult<()> {
        let invalid = |reason: String| RuleError::Invalid {
            rule: self.name.clone(),
            reason,
        };

        if self.child_shape.is_empty() {
            return Err(invalid("child_shape is empty".to_string()));
        }
        match self.child_shape.get(self.body_child) {
            Some(NodeKind::Expression) => {}
            Some(kind) => {
                return Err(invalid(format!(
                    "body_child {} is a {} slot, expected EXPRESSION",
                    self.body_child, kind
                )))
            }
            None => {
                return Err(invalid(format!(
                    "body_child {} is outside child_shape of length {}",
                    self.body_child,
                    self.child_shape.len()
                )))
            }
        }

        for (position, predicate) in self.operations.iter().enumerate() {
            for earlier in predicate.references() {
                if earlier >= position {
                    return Err(invalid(format!(
                        "operation {} refers to result_of({}), which is not earlier",
                        position, earlier
                    )));
                }
                if !self.operations[earlier].yields_result() {
                    return Err(invalid(format!(
                        "operation {} refers to result_of({}), a {} with no result",
                        position,
                        earlier,
                        self.operations[earlier].kind()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationPredicate {
    Condition {
        value: OperandSpec,
    },
    /// Source must be a literal with exactly this value.
    TypeConversion {
        literal: Constant,
        target_type: String,
    },
    Binary {
        operator: BinaryOp,
        left: OperandSpec,
        right: OperandSpec,
    },
    Call {
        signature: String,
        #[serde(default)]
        arguments: Vec<ArgumentSpec>,
    },
}

impl OperationPredicate {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationPredicate::Condition { .. } => OperationKind::Condition,
            OperationPredicate::TypeConversion { .. } => OperationKind::TypeConversion,
            OperationPredicate::Binary { .. } => OperationKind::Binary,
            OperationPredicate::Call { .. } => OperationKind::Call,
        }
    }

    pub fn yields_result(&self) -> bool {
        !matches!(self, OperationPredicate::Condition { .. })
    }

    /// Earlier positions whose results this predicate cross-references.
    pub fn references(&self) -> Vec<usize> {
        let specs: Vec<&OperandSpec> = match self {
            OperationPredicate::Condition { value } => vec![value],
            OperationPredicate::TypeConversion { .. } => vec![],
            OperationPredicate::Binary { left, right, .. } => vec![left, right],
            OperationPredicate::Call { arguments, .. } => {
                arguments.iter().map(|a| &a.operand).collect()
            }
        };
        specs
            .into_iter()
            .filter_map(|spec| match spec {
                OperandSpec::ResultOf(position) => Some(*position),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub index: usize,
    pub operand: OperandSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandSpec {
    /// The very temporary produced at an earlier position of the same sequence.
    ResultOf(usize),
    /// A user-named local, compared by name.
    Local(String),
    Literal(Constant),
    Any,
}

impl std::fmt::Display for OperandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandSpec::ResultOf(position) => write!(f, "result of operation {}", position),
            OperandSpec::Local(name) => write!(f, "local `{}`", name),
            OperandSpec::Literal(value) => write!(f, "literal {}", value),
            OperandSpec::Any => write!(f, "any value"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<InvariantRule>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFile {
    Many(Vec<InvariantRule>),
    One(InvariantRule),
}

impl RuleSet {
    pub fn new(rules: Vec<InvariantRule>) -> Self {
        Self { rules }
    }

    /// Parses a single rule object or an array of rules.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rules = match serde_json::from_str::<RuleFile>(json)? {
            RuleFile::Many(rules) => rules,
            RuleFile::One(rule) => vec![rule],
        };
        Ok(Self { rules })
    }

    /// Loads a rule file, or every `*.json` below a directory in path order.
    pub fn load(path: &Path) -> RuleResult<Self> {
        let mut set = RuleSet::default();

        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| RuleError::Walk {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
                if entry.file_type().is_file() && is_json {
                    set.extend(Self::load_file(entry.path())?);
                }
            }
        } else {
            set.extend(Self::load_file(path)?);
        }

        for rule in &set.rules {
            rule.validate()?;
        }
        Ok(set)
    }

    fn load_file(path: &Path) -> RuleResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| RuleError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
