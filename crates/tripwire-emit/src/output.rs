use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tripwire_verify::{Ambiguity, RuleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Flat, serializable view of one rule outcome.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub rule: String,
    pub target: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_check: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguities: Vec<Ambiguity>,
}

impl OutcomeRecord {
    pub fn from_outcome(outcome: &RuleOutcome) -> Result<Self> {
        let record = match &outcome.result {
            Ok(pass) => OutcomeRecord {
                rule: outcome.rule.clone(),
                target: outcome.target.clone(),
                passed: true,
                failed_check: None,
                message: format!("guard matched at {}", pass.matched_node),
                details: Some(serde_json::to_value(pass)?),
                ambiguities: outcome.ambiguities.clone(),
            },
            Err(err) => OutcomeRecord {
                rule: outcome.rule.clone(),
                target: outcome.target.clone(),
                passed: false,
                failed_check: Some(err.check_name().to_string()),
                message: err.to_string(),
                details: match err {
                    tripwire_verify::VerifyError::InvariantViolation(violation) => {
                        Some(serde_json::to_value(violation)?)
                    }
                    _ => None,
                },
                ambiguities: outcome.ambiguities.clone(),
            },
        };
        Ok(record)
    }
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn write_outcomes<W: Write>(writer: &mut W, outcomes: &[RuleOutcome]) -> Result<()> {
        let records = outcomes
            .iter()
            .map(OutcomeRecord::from_outcome)
            .collect::<Result<Vec<_>>>()?;
        serde_json::to_writer_pretty(&mut *writer, &records)?;
        writeln!(writer)?;
        Ok(())
    }
}
