/*! Fluent API for assembling analysis models by hand.
 *
 * Embedders and tests rarely want to number arenas themselves. These builders hand out fresh node
 * ids and fresh temporaries so every produced value has its own identity, exactly as an analyzer
 * would emit them.
 */

pub mod contract_builder;
pub mod function_builder;

pub use contract_builder::{ContractBuilder, ProgramBuilder};
pub use function_builder::FunctionBuilder;
