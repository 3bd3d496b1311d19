/*! Discover fuzz property tests by convention.
 *
 * Echidna only deploys contracts whose constructor takes no arguments, and treats public
 * `view`/`pure` functions with a fixed prefix as properties. This scan lists them per contract.
 */

use serde::{Deserialize, Serialize};
use tripwire_core::{ProgramModel, Visibility};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub prefix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            prefix: "echidna_".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzContract {
    pub name: String,
    pub immediate_inheritance: Vec<String>,
    /// `Contract.function(types)` entries in declaration order.
    pub tests: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EntryPointScanner {
    config: ScanConfig,
}

impl EntryPointScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn scan<M: ProgramModel + ?Sized>(&self, model: &M) -> Vec<FuzzContract> {
        model
            .contracts()
            .iter()
            .filter(|contract| {
                contract
                    .constructor()
                    .map_or(true, |ctor| ctor.parameters.is_empty())
            })
            .filter_map(|contract| {
                let tests: Vec<String> = contract
                    .functions
                    .iter()
                    .filter(|f| f.name.starts_with(&self.config.prefix))
                    .filter(|f| f.is_read_only())
                    .filter(|f| f.visibility == Visibility::Public)
                    .map(|f| format!("{}.{}", contract.name, f.full_name()))
                    .collect();

                if tests.is_empty() {
                    return None;
                }
                Some(FuzzContract {
                    name: contract.name.clone(),
                    immediate_inheritance: contract.immediate_inheritance.clone(),
                    tests,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tripwire_core::{ContractBuilder, FunctionBuilder, Mutability, ProgramBuilder};

    fn property(name: &str, vis: Visibility, mutability: Mutability) -> tripwire_core::Function {
        let mut f = FunctionBuilder::new(name);
        f.visibility(vis).mutability(mutability);
        f.build().unwrap()
    }

    #[test]
    fn test_scan_filters_by_convention() {
        let mut fuzz = ContractBuilder::new("FuzzPortal");
        fuzz.inherits("OptimismPortal")
            .inherits("StdUtils")
            .function(property("echidna_no_mint", Visibility::Public, Mutability::View))
            .function(property("echidna_pure", Visibility::Public, Mutability::Pure))
            .function(property("echidna_writes", Visibility::Public, Mutability::NonPayable))
            .function(property("echidna_hidden", Visibility::External, Mutability::View))
            .function(property("check_other", Visibility::Public, Mutability::View));

        let mut with_args = ContractBuilder::new("NeedsArgs");
        let mut ctor = FunctionBuilder::new("constructor");
        ctor.constructor().param("owner", "address");
        with_args
            .function(ctor.build().unwrap())
            .function(property("echidna_x", Visibility::Public, Mutability::View));

        let mut program = ProgramBuilder::new();
        program.contract(fuzz.build()).contract(with_args.build());
        let found = EntryPointScanner::default().scan(&program.build());

        assert_eq!(
            found,
            vec![FuzzContract {
                name: "FuzzPortal".to_string(),
                immediate_inheritance: vec!["OptimismPortal".to_string(), "StdUtils".to_string()],
                tests: vec![
                    "FuzzPortal.echidna_no_mint()".to_string(),
                    "FuzzPortal.echidna_pure()".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn test_zero_arg_constructor_is_deployable() {
        let mut ctor = FunctionBuilder::new("constructor");
        ctor.constructor();
        let mut c = ContractBuilder::new("Deployable");
        c.function(ctor.build().unwrap())
            .function(property("prop_ok", Visibility::Public, Mutability::View));
        let mut program = ProgramBuilder::new();
        program.contract(c.build());

        let scanner = EntryPointScanner::new(ScanConfig {
            prefix: "prop_".to_string(),
        });
        let found = scanner.scan(&program.build());
        assert_eq!(found.len(), 1);
        assert!(found[0].immediate_inheritance.is_empty());
        assert_eq!(found[0].tests, vec!["Deployable.prop_ok()"]);
    }
}
