use crate::config::ReportConfig;
use crate::output::{JsonFormatter, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use tripwire_verify::{RuleOutcome, VerifyError, Violation};

pub struct VerificationEmitter<'a> {
    outcomes: &'a [RuleOutcome],
    config: ReportConfig,
}

impl<'a> VerificationEmitter<'a> {
    pub fn new(outcomes: &'a [RuleOutcome]) -> Self {
        Self {
            outcomes,
            config: ReportConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn emit(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.emit_to_string()),
            OutputFormat::Json => {
                let mut buffer = Vec::new();
                JsonFormatter::write_outcomes(&mut buffer, self.outcomes)?;
                Ok(String::from_utf8(buffer)?)
            }
        }
    }

    pub fn emit_to_string(&self) -> String {
        let mut output = String::new();

        for outcome in self.outcomes {
            match &outcome.result {
                Ok(pass) => {
                    if !self.config.verbosity.should_print_passes() {
                        continue;
                    }
                    output.push_str(&format!(
                        "{} {} ({}): guard matched at {}\n",
                        self.label(true),
                        outcome.rule,
                        outcome.target,
                        pass.matched_node
                    ));
                    self.print_notes(&mut output, outcome);
                }
                Err(err) => {
                    self.print_failure(&mut output, outcome, err);
                    self.print_notes(&mut output, outcome);
                }
            }
        }

        let failed = self.outcomes.iter().filter(|o| !o.passed()).count();
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!(
            "{} rule(s) checked: {} passed, {} failed\n",
            self.outcomes.len(),
            self.outcomes.len() - failed,
            failed
        ));
        output
    }

    fn print_notes(&self, output: &mut String, outcome: &RuleOutcome) {
        for ambiguity in &outcome.ambiguities {
            output.push_str(&format!(
                "{}note: {}\n",
                self.config.indent_str(1),
                ambiguity
            ));
        }
    }

    fn print_failure(&self, output: &mut String, outcome: &RuleOutcome, err: &VerifyError) {
        output.push_str(&format!(
            "{} {} ({}) [{}]: {}\n",
            self.label(false),
            outcome.rule,
            outcome.target,
            err.check_name(),
            err
        ));

        if !self.config.verbosity.should_print_near_misses() {
            return;
        }
        if let VerifyError::InvariantViolation(Violation::StructuralPattern { near_misses, .. }) =
            err
        {
            for miss in near_misses {
                output.push_str(&format!(
                    "{}near miss at {}\n",
                    self.config.indent_str(2),
                    miss
                ));
            }
        }
    }

    fn label(&self, passed: bool) -> String {
        match (passed, self.config.use_colors) {
            (true, true) => "PASS".bright_green().bold().to_string(),
            (false, true) => "FAIL".bright_red().bold().to_string(),
            (true, false) => "PASS".to_string(),
            (false, false) => "FAIL".to_string(),
        }
    }
}
