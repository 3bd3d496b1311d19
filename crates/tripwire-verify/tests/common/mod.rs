#![allow(dead_code)]

use tripwire_core::{
    BinaryOp, ContractBuilder, Function, FunctionBuilder, NodeKind, Program, ProgramBuilder,
    Visibility, Mutability,
};

/// What the `require` call receives as its first argument.
pub enum RequireArg {
    Comparison,
    Local(&'static str),
    Nothing,
}

/// Knobs for the `depositTransaction` fixture. The default reproduces the
/// guarded block the built-in rule expects.
pub struct Shape {
    pub guard: &'static str,
    pub literal: i64,
    pub target_type: &'static str,
    /// Emit `literal + literal` where the conversion belongs.
    pub binary_instead_of_conversion: bool,
    pub operator: BinaryOp,
    pub extra_operation: bool,
    pub compare_against_foreign_zero: bool,
    pub require_signature: &'static str,
    pub require_arg: RequireArg,
    pub extra_calls: Vec<(&'static str, &'static str)>,
    pub decoy_first: bool,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            guard: "_isCreation",
            literal: 0,
            target_type: "address",
            binary_instead_of_conversion: false,
            operator: BinaryOp::Equal,
            extra_operation: false,
            compare_against_foreign_zero: false,
            require_signature: "require(bool,string)",
            require_arg: RequireArg::Comparison,
            extra_calls: Vec::new(),
            decoy_first: false,
        }
    }
}

fn decoy(f: &mut FunctionBuilder) {
    let flag = f.local("_paused");
    let guard = f.node(NodeKind::Conditional);
    f.condition(guard, flag);
    let body = f.node(NodeKind::Expression);
    let end = f.node(NodeKind::BlockEnd);
    f.link(guard, body).link(guard, end);
    let msg = f.literal("paused");
    f.call_void(body, "revert(string)", vec![msg]);
}

pub fn deposit_transaction(shape: &Shape) -> Function {
    let mut f = FunctionBuilder::new("depositTransaction");
    f.param("_to", "address")
        .param("_value", "uint256")
        .param("_gasLimit", "uint64")
        .param("_isCreation", "bool")
        .param("_data", "bytes")
        .visibility(Visibility::Public)
        .mutability(Mutability::Payable)
        .high_level_call("AddressAliasHelper", "applyL1ToL2Alias");
    for (contract, function) in &shape.extra_calls {
        f.high_level_call(contract, function);
    }

    if shape.decoy_first {
        decoy(&mut f);
    }

    let is_creation = f.local(shape.guard);
    let to = f.local("_to");

    let entry = f.node(NodeKind::Other);
    let guard = f.node(NodeKind::Conditional);
    f.link(entry, guard);
    f.condition(guard, is_creation);
    let body = f.node(NodeKind::Expression);
    let end = f.node(NodeKind::BlockEnd);
    f.link(guard, body).link(guard, end);

    let zero = f.literal(shape.literal);
    let address_zero = if shape.binary_instead_of_conversion {
        f.binary(body, BinaryOp::Add, zero, zero)
    } else {
        f.convert(body, zero, shape.target_type)
    };

    let compared = if shape.compare_against_foreign_zero {
        let elsewhere = f.node(NodeKind::Expression);
        let other_zero = f.literal(0);
        f.convert(elsewhere, other_zero, "address")
    } else {
        address_zero
    };
    let eq = f.binary(body, shape.operator, to, compared);

    if shape.extra_operation {
        let value = f.local("_value");
        let limit = f.local("_gasLimit");
        f.binary(body, BinaryOp::Less, value, limit);
    }

    let msg = f.literal("OptimismPortal: must send to address(0) when creating a contract");
    let arguments = match shape.require_arg {
        RequireArg::Comparison => vec![eq, msg],
        RequireArg::Local(name) => vec![f.local(name), msg],
        RequireArg::Nothing => Vec::new(),
    };
    f.call_void(body, shape.require_signature, arguments);

    if !shape.decoy_first {
        decoy(&mut f);
    }

    f.build().unwrap()
}

pub fn portal_program(function: Function) -> Program {
    let mut portal = ContractBuilder::new("OptimismPortal");
    portal.inherits("Initializable").inherits("ResourceMetering").function(function);
    let mut helper = ContractBuilder::new("AddressAliasHelper");
    helper.function(FunctionBuilder::new("applyL1ToL2Alias").build().unwrap());

    let mut program = ProgramBuilder::new();
    program.contract(helper.build()).contract(portal.build());
    program.build()
}
