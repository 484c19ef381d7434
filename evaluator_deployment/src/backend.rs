use ethers::{
    abi::Token,
    types::{Address, H256},
};

use crate::artifacts::ContractBlueprint;

/// A mined contract instance and the blueprint it was created from
#[derive(Clone, Debug)]
pub struct DeployedContract {
    pub blueprint: ContractBlueprint,
    pub address: Address,
}

/// Connection to a chain that contracts can be deployed to and called on.
///
/// Every method blocks until the submitted transaction is mined; a failure at any
/// point (RPC error, revert, insufficient funds) is returned as an error.
#[allow(async_fn_in_trait)]
pub trait DeploymentBackend {
    /// Resolve a compiled contract by name
    fn contract_factory(&self, name: &str) -> anyhow::Result<ContractBlueprint>;

    async fn deploy(
        &self,
        blueprint: &ContractBlueprint,
        constructor_args: Vec<Token>,
    ) -> anyhow::Result<Address>;

    /// Submit a state changing call, returning the mined tx hash
    async fn send(
        &self,
        contract: &DeployedContract,
        method: &str,
        args: Vec<Token>,
    ) -> anyhow::Result<H256>;
}
