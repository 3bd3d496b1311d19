use crate::function::Function;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<Function>,
    /// Contracts listed directly in the `is` clause.
    #[serde(default)]
    pub immediate_inheritance: Vec<String>,
    /// Every ancestor at any depth.
    #[serde(default)]
    pub inheritance: Vec<String>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            immediate_inheritance: Vec::new(),
            inheritance: Vec::new(),
        }
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    /// First function with exactly this name. Overloads after the first are
    /// not reachable through this lookup.
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn constructor(&self) -> Option<&Function> {
        self.functions.iter().find(|f| f.is_constructor)
    }

    pub fn inherits_from(&self, name: &str) -> bool {
        self.inheritance.iter().any(|c| c == name)
    }
}
