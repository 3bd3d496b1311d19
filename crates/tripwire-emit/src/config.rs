use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub use_colors: bool,
    pub indent: usize,
    pub verbosity: VerbosityLevel,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            indent: 2,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl ReportConfig {
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            ..Self::default()
        }
    }

    pub fn indent_str(&self, level: usize) -> String {
        " ".repeat(self.indent * level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
}

impl VerbosityLevel {
    pub fn should_print_passes(&self) -> bool {
        !matches!(self, VerbosityLevel::Quiet)
    }

    pub fn should_print_near_misses(&self) -> bool {
        matches!(self, VerbosityLevel::Verbose)
    }
}
