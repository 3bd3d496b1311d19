/*! Read-only accessor over an analyzer's output.
 *
 * The verifier never talks to an analyzer directly. It depends on this small, versioned contract:
 * an ordered list of contracts with their functions, CFG nodes, IR operations and variables.
 * `Program` is the in-memory form of that contract and the JSON interchange format analyzers
 * export to.
 */

use crate::contract::Contract;
use crate::function::Function;
use crate::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Version of the accessor contract this crate implements.
pub const ACCESSOR_VERSION: u32 = 1;

pub trait ProgramModel {
    fn accessor_version(&self) -> u32 {
        ACCESSOR_VERSION
    }

    /// Contracts in analyzer order.
    fn contracts(&self) -> &[Contract];

    fn contracts_named<'a>(&'a self, name: &'a str) -> Vec<&'a Contract> {
        self.contracts().iter().filter(|c| c.name == name).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

fn default_version() -> u32 {
    ACCESSOR_VERSION
}

impl Program {
    pub fn new(contracts: Vec<Contract>) -> Self {
        Self {
            version: ACCESSOR_VERSION,
            contracts,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(json)?;
        program.validate()?;
        Ok(program)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every node and variable reference resolves inside its
    /// own function.
    pub fn validate(&self) -> Result<()> {
        for contract in &self.contracts {
            for function in &contract.functions {
                validate_function(&contract.name, function)?;
            }
        }
        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ProgramModel for Program {
    fn accessor_version(&self) -> u32 {
        self.version
    }

    fn contracts(&self) -> &[Contract] {
        &self.contracts
    }
}

fn validate_function(contract: &str, function: &Function) -> Result<()> {
    let owner = || format!("{}.{}", contract, function.name);

    for (&id, node) in &function.nodes {
        if id != node.id {
            return Err(ModelError::NodeIdMismatch {
                function: owner(),
                key: id,
                node: node.id,
            });
        }

        for &child in &node.children {
            if function.node(child).is_none() {
                return Err(ModelError::DanglingNode {
                    function: owner(),
                    from: id,
                    to: child,
                });
            }
        }

        for op in &node.operations {
            let referenced = op.operands().into_iter().chain(op.result());
            for var in referenced {
                if function.variable(var).is_none() {
                    return Err(ModelError::DanglingVariable {
                        function: owner(),
                        node: id,
                        var,
                    });
                }
            }
        }
    }

    Ok(())
}
