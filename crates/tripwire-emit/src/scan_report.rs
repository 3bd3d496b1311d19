use crate::config::ReportConfig;
use colored::Colorize;
use tripwire_verify::FuzzContract;

pub struct ScanReportEmitter<'a> {
    contracts: &'a [FuzzContract],
    config: ReportConfig,
}

impl<'a> ScanReportEmitter<'a> {
    pub fn new(contracts: &'a [FuzzContract]) -> Self {
        Self {
            contracts,
            config: ReportConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn emit_to_string(&self) -> String {
        let mut output = String::from("Fuzz property tests:\n");

        if self.contracts.is_empty() {
            output.push_str(&format!("{}<none>\n", self.config.indent_str(1)));
            return output;
        }

        for contract in self.contracts {
            self.print_contract(&mut output, contract);
        }

        output
    }

    fn print_contract(&self, output: &mut String, contract: &FuzzContract) {
        let inherited = if contract.immediate_inheritance.is_empty() {
            "<none>".to_string()
        } else {
            contract.immediate_inheritance.join(", ")
        };
        let name = if self.config.use_colors {
            contract.name.bright_green().bold().to_string()
        } else {
            contract.name.clone()
        };

        output.push_str(&format!(
            "\nContract: {} (inherits from: {})\n",
            name, inherited
        ));
        output.push_str("Property tests:\n");
        for test in &contract.tests {
            output.push_str(&format!("{}- {}\n", self.config.indent_str(1), test));
        }
    }
}
