use crate::{
    function::{Function, HighLevelCall, Mutability, Parameter, Visibility},
    node::{CfgNode, NodeId, NodeKind},
    operations::{BinaryOp, Operation},
    values::{Constant, VarId, Variable},
    ModelError, Result,
};

pub struct FunctionBuilder {
    function: Function,
    next_node_id: u32,
    errors: Vec<ModelError>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            function: Function::new(name),
            next_node_id: 0,
            errors: Vec::new(),
        }
    }

    pub fn param(&mut self, name: &str, ty: &str) -> &mut Self {
        self.function.parameters.push(Parameter::new(name, ty));
        self
    }

    pub fn visibility(&mut self, vis: Visibility) -> &mut Self {
        self.function.visibility = vis;
        self
    }

    pub fn mutability(&mut self, mut_: Mutability) -> &mut Self {
        self.function.mutability = mut_;
        self
    }

    pub fn constructor(&mut self) -> &mut Self {
        self.function.is_constructor = true;
        self
    }

    pub fn high_level_call(&mut self, contract: &str, function: &str) -> &mut Self {
        self.function
            .high_level_calls
            .push(HighLevelCall::new(contract, function));
        self
    }

    fn alloc(&mut self, var: Variable) -> VarId {
        let id = VarId(self.function.variables.len() as u32);
        self.function.variables.push(var);
        id
    }

    pub fn local(&mut self, name: &str) -> VarId {
        self.alloc(Variable::local(name))
    }

    /// Every call materialises a new literal with its own identity, even when
    /// the value repeats.
    pub fn literal(&mut self, value: impl Into<Constant>) -> VarId {
        self.alloc(Variable::literal(value))
    }

    pub fn temporary(&mut self) -> VarId {
        self.alloc(Variable::temporary())
    }

    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.function.nodes.insert(id, CfgNode::new(id, kind));
        id
    }

    pub fn link(&mut self, parent: NodeId, child: NodeId) -> &mut Self {
        match self.function.nodes.get_mut(&parent) {
            Some(node) => node.children.push(child),
            None => self.errors.push(ModelError::UnknownNode(parent)),
        }
        self
    }

    pub fn push(&mut self, node: NodeId, op: Operation) -> &mut Self {
        match self.function.nodes.get_mut(&node) {
            Some(target) => target.operations.push(op),
            None => self.errors.push(ModelError::UnknownNode(node)),
        }
        self
    }

    pub fn condition(&mut self, node: NodeId, value: VarId) -> &mut Self {
        self.push(node, Operation::Condition { value })
    }

    pub fn convert(&mut self, node: NodeId, source: VarId, target_type: &str) -> VarId {
        let result = self.alloc(Variable::Temporary {
            ty: Some(target_type.to_string()),
        });
        self.push(
            node,
            Operation::TypeConversion {
                source,
                target_type: target_type.to_string(),
                result,
            },
        );
        result
    }

    pub fn binary(&mut self, node: NodeId, operator: BinaryOp, left: VarId, right: VarId) -> VarId {
        let result = self.temporary();
        self.push(
            node,
            Operation::Binary {
                operator,
                left,
                right,
                result,
            },
        );
        result
    }

    pub fn call(&mut self, node: NodeId, callee: &str, arguments: Vec<VarId>) -> VarId {
        let result = self.temporary();
        self.push(
            node,
            Operation::Call {
                callee: callee.to_string(),
                arguments,
                result: Some(result),
            },
        );
        result
    }

    /// A call whose value is discarded, such as `require(...)`.
    pub fn call_void(&mut self, node: NodeId, callee: &str, arguments: Vec<VarId>) -> &mut Self {
        self.push(
            node,
            Operation::Call {
                callee: callee.to_string(),
                arguments,
                result: None,
            },
        )
    }

    pub fn build(mut self) -> Result<Function> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        Ok(self.function)
    }
}
