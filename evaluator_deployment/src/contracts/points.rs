use ethers::{
    abi::Token,
    types::{Address, H256, U256},
};

use crate::{
    artifacts::ContractBlueprint,
    backend::{DeployedContract, DeploymentBackend},
};

pub const POINTS_TOKEN_NAME: &str = "ERC721-101";
pub const POINTS_TOKEN_SYMBOL: &str = "ERC721-101";
pub const POINTS_INITIAL_SUPPLY: u64 = 0;

/// The ERC20-like points token evaluators award points from
pub struct PointsToken {
    contract: DeployedContract,
}

impl PointsToken {
    /// `constructor(string name, string symbol, uint256 initialSupply)`
    pub fn constructor_args() -> Vec<Token> {
        vec![
            Token::String(POINTS_TOKEN_NAME.to_owned()),
            Token::String(POINTS_TOKEN_SYMBOL.to_owned()),
            Token::Uint(U256::from(POINTS_INITIAL_SUPPLY)),
        ]
    }

    pub async fn deploy(
        backend: &impl DeploymentBackend,
        blueprint: ContractBlueprint,
    ) -> anyhow::Result<Self> {
        let address = backend
            .deploy(&blueprint, Self::constructor_args())
            .await?;

        Ok(Self {
            contract: DeployedContract { blueprint, address },
        })
    }

    pub fn address(&self) -> Address {
        self.contract.address
    }

    /// Grant (or revoke) the teacher role, letting `teacher` mutate points balances
    pub async fn set_teacher(
        &self,
        backend: &impl DeploymentBackend,
        teacher: Address,
        is_teacher: bool,
    ) -> anyhow::Result<H256> {
        backend
            .send(
                &self.contract,
                "setTeacher",
                vec![Token::Address(teacher), Token::Bool(is_teacher)],
            )
            .await
    }
}
