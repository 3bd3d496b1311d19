use crate::{
    contract::Contract,
    function::Function,
    model::Program,
};

pub struct ContractBuilder {
    contract: Contract,
}

impl ContractBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            contract: Contract::new(name),
        }
    }

    /// Records a direct parent. It is added to the transitive set as well.
    pub fn inherits(&mut self, parent: &str) -> &mut Self {
        self.contract.immediate_inheritance.push(parent.to_string());
        self.ancestor(parent)
    }

    pub fn ancestor(&mut self, name: &str) -> &mut Self {
        if !self.contract.inherits_from(name) {
            self.contract.inheritance.push(name.to_string());
        }
        self
    }

    pub fn function(&mut self, function: Function) -> &mut Self {
        self.contract.add_function(function);
        self
    }

    pub fn build(self) -> Contract {
        self.contract
    }
}

#[derive(Default)]
pub struct ProgramBuilder {
    contracts: Vec<Contract>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract(&mut self, contract: Contract) -> &mut Self {
        self.contracts.push(contract);
        self
    }

    pub fn build(self) -> Program {
        Program::new(self.contracts)
    }
}
