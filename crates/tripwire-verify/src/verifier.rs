/*! Run a rule against a model.
 *
 * The checks run in a fixed order (contract lookup, function lookup, call multiset, structural
 * pattern) and the first failure ends the run for that rule. Rules are independent: a failing
 * rule never stops the next one from being evaluated.
 */

use crate::pattern::{NearMiss, PatternMatcher};
use crate::rule::InvariantRule;
use crate::{VerifyError, VerifyResult};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, warn};
use tripwire_core::{NodeId, ProgramModel, ACCESSOR_VERSION};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    pub rule: String,
    pub contract: String,
    pub function: String,
    pub matched_node: NodeId,
    pub ambiguities: Vec<Ambiguity>,
}

/// Several contracts shared the target name; the first was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub contract: String,
    pub matches: usize,
}

impl std::fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} contracts named {}, checked the first",
            self.matches, self.contract
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum Violation {
    CallSet {
        expected: Vec<String>,
        actual: Vec<String>,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    StructuralPattern {
        guard: String,
        candidates: usize,
        near_misses: Vec<NearMiss>,
    },
}

impl Violation {
    pub fn check_name(&self) -> &'static str {
        match self {
            Violation::CallSet { .. } => "call-set",
            Violation::StructuralPattern { .. } => "structural-pattern",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::CallSet {
                expected,
                actual,
                missing,
                unexpected,
            } => {
                write!(
                    f,
                    "call-set mismatch: expected {:?}, actual {:?}",
                    expected, actual
                )?;
                if !unexpected.is_empty() {
                    write!(f, "; unexpected {:?}", unexpected)?;
                }
                if !missing.is_empty() {
                    write!(f, "; missing {:?}", missing)?;
                }
                Ok(())
            }
            Violation::StructuralPattern {
                guard,
                candidates,
                ..
            } => write!(
                f,
                "structural pattern not found: no guard on `{}` matched ({} conditional node(s) rejected)",
                guard, candidates
            ),
        }
    }
}

#[derive(Debug)]
pub struct RuleOutcome {
    pub rule: String,
    pub target: String,
    pub result: VerifyResult<Pass>,
    /// Recorded whether the rule passed or not.
    pub ambiguities: Vec<Ambiguity>,
}

impl RuleOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Self
    }

    pub fn verify<M: ProgramModel + ?Sized>(
        &self,
        model: &M,
        rule: &InvariantRule,
    ) -> VerifyResult<Pass> {
        self.run(model, rule, &mut Vec::new())
    }

    fn run<M: ProgramModel + ?Sized>(
        &self,
        model: &M,
        rule: &InvariantRule,
        ambiguities: &mut Vec<Ambiguity>,
    ) -> VerifyResult<Pass> {
        let found = model.accessor_version();
        if found != ACCESSOR_VERSION {
            return Err(VerifyError::UnsupportedModelVersion {
                found,
                expected: ACCESSOR_VERSION,
            });
        }
        rule.validate()?;

        let candidates = model.contracts_named(&rule.target_contract);
        let contract = *candidates
            .first()
            .ok_or_else(|| VerifyError::contract_not_found(&rule.target_contract))?;
        if candidates.len() > 1 {
            warn!(
                contract = %rule.target_contract,
                matches = candidates.len(),
                "ambiguous contract name, using the first"
            );
            ambiguities.push(Ambiguity {
                contract: rule.target_contract.clone(),
                matches: candidates.len(),
            });
        }

        let function = contract
            .get_function(&rule.target_function)
            .ok_or_else(|| VerifyError::function_not_found(&rule.target()))?;
        debug!(rule = %rule.name, target = %rule.target(), "target located");

        let actual = function.call_signatures();
        let expected = rule.sorted_expected_calls();
        if actual != expected {
            let (missing, unexpected) = multiset_difference(&expected, &actual);
            return Err(VerifyError::InvariantViolation(Violation::CallSet {
                expected,
                actual,
                missing,
                unexpected,
            }));
        }

        let report = PatternMatcher::new(rule).explain(function);
        match report.matched {
            Some(matched_node) => Ok(Pass {
                rule: rule.name.clone(),
                contract: contract.name.clone(),
                function: function.name.clone(),
                matched_node,
                ambiguities: ambiguities.clone(),
            }),
            None => Err(VerifyError::InvariantViolation(
                Violation::StructuralPattern {
                    guard: rule.guard_variable.clone(),
                    candidates: report.candidates,
                    near_misses: report.near_misses,
                },
            )),
        }
    }

    pub fn verify_all<M: ProgramModel + ?Sized>(
        &self,
        model: &M,
        rules: &[InvariantRule],
    ) -> Vec<RuleOutcome> {
        rules
            .iter()
            .map(|rule| {
                let mut ambiguities = Vec::new();
                let result = self.run(model, rule, &mut ambiguities);
                match &result {
                    Ok(_) => info!(rule = %rule.name, "invariant holds"),
                    Err(err) => info!(rule = %rule.name, error = %err, "invariant check failed"),
                }
                RuleOutcome {
                    rule: rule.name.clone(),
                    target: rule.target(),
                    result,
                    ambiguities,
                }
            })
            .collect()
    }
}

/// Both inputs sorted. Returns `(only in expected, only in actual)` with
/// multiplicity.
fn multiset_difference(expected: &[String], actual: &[String]) -> (Vec<String>, Vec<String>) {
    let mut missing = Vec::new();
    let mut unexpected = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < expected.len() && j < actual.len() {
        match expected[i].cmp(&actual[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                missing.push(expected[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                unexpected.push(actual[j].clone());
                j += 1;
            }
        }
    }
    missing.extend_from_slice(&expected[i..]);
    unexpected.extend_from_slice(&actual[j..]);

    (missing, unexpected)
}
