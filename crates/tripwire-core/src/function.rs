use crate::node::{CfgNode, NodeId};
use crate::values::{VarId, Variable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub visibility: Visibility,
    pub mutability: Mutability,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default, with = "node_list")]
    pub nodes: IndexMap<NodeId, CfgNode>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub high_level_calls: Vec<HighLevelCall>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            visibility: Visibility::Public,
            mutability: Mutability::NonPayable,
            is_constructor: false,
            nodes: IndexMap::new(),
            variables: Vec::new(),
            high_level_calls: Vec::new(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&CfgNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CfgNode> {
        self.nodes.values()
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Signature-style name, e.g. `echidna_balance(address,uint256)`.
    pub fn full_name(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| p.param_type.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.name, params)
    }

    /// Outgoing high-level calls rendered as `Contract.function`, sorted.
    /// Duplicates are kept.
    pub fn call_signatures(&self) -> Vec<String> {
        let mut calls: Vec<String> = self
            .high_level_calls
            .iter()
            .map(|c| c.to_string())
            .collect();
        calls.sort();
        calls
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, Mutability::Pure | Mutability::View)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighLevelCall {
    pub contract: String,
    pub function: String,
}

impl HighLevelCall {
    pub fn new(contract: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            function: function.into(),
        }
    }
}

impl std::fmt::Display for HighLevelCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.contract, self.function)
    }
}

/// Nodes are exchanged as a plain list; the map is rebuilt on load and a
/// repeated id is a decode error.
mod node_list {
    use super::{CfgNode, NodeId};
    use indexmap::IndexMap;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        nodes: &IndexMap<NodeId, CfgNode>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&CfgNode> = nodes.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<NodeId, CfgNode>, D::Error> {
        let list = Vec::<CfgNode>::deserialize(deserializer)?;
        let mut nodes = IndexMap::with_capacity(list.len());
        for node in list {
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(D::Error::custom(format!("duplicate node id {}", id)));
            }
        }
        Ok(nodes)
    }
}
