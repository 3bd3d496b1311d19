/*! Read-only analysis model for structural invariant checking.
 *
 * Security invariants are stated against compiled structure: which node branches on which local,
 * which operations run under that branch, which values feed which checks. This crate holds that
 * structure (contracts, functions, CFG nodes, IR operations and a per-function variable arena)
 * behind a small versioned accessor so checks never reach into an analyzer's internals.
 */

pub mod builder;
pub mod contract;
pub mod function;
pub mod model;
pub mod node;
pub mod operations;
pub mod values;

pub use builder::{ContractBuilder, FunctionBuilder, ProgramBuilder};
pub use contract::Contract;
pub use function::{Function, HighLevelCall, Mutability, Parameter, Visibility};
pub use model::{Program, ProgramModel, ACCESSOR_VERSION};
pub use node::{CfgNode, NodeId, NodeKind};
pub use operations::{BinaryOp, Operation, OperationKind};
pub use values::{Constant, VarId, Variable};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Malformed model: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{function}: node {key} is stored under a different id ({node})")]
    NodeIdMismatch {
        function: String,
        key: NodeId,
        node: NodeId,
    },
    #[error("{function}: {from} points at missing child {to}")]
    DanglingNode {
        function: String,
        from: NodeId,
        to: NodeId,
    },
    #[error("{function}: {node} references missing variable {var}")]
    DanglingVariable {
        function: String,
        node: NodeId,
        var: VarId,
    },
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests;
