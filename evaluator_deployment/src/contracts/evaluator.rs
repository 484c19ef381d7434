use ethers::{
    abi::Token,
    types::{Address, H256},
};

use crate::{
    artifacts::ContractBlueprint,
    backend::{DeployedContract, DeploymentBackend},
    seed::SeedData,
};

/// An evaluator contract. `Evaluator` and `Evaluator2` share this interface.
pub struct EvaluatorContract {
    contract: DeployedContract,
}

impl EvaluatorContract {
    pub async fn deploy(
        backend: &impl DeploymentBackend,
        blueprint: ContractBlueprint,
        points_token: Address,
    ) -> anyhow::Result<Self> {
        let address = backend
            .deploy(&blueprint, vec![Token::Address(points_token)])
            .await?;

        Ok(Self {
            contract: DeployedContract { blueprint, address },
        })
    }

    pub fn name(&self) -> &str {
        &self.contract.blueprint.name
    }

    pub fn address(&self) -> Address {
        self.contract.address
    }

    pub async fn set_random_values_store(
        &self,
        backend: &impl DeploymentBackend,
        seed: &SeedData,
    ) -> anyhow::Result<H256> {
        backend
            .send(&self.contract, "setRandomValuesStore", seed.to_tokens())
            .await
    }
}
