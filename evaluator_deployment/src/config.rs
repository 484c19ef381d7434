use std::{collections::BTreeMap, path::PathBuf};

use anyhow::anyhow;
use serde::Deserialize;

const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
const SEPOLIA_RPC_URL_ENV_VAR: &str = "SEPOLIA_RPC_URL";
const LOCALHOST_RPC_URL_ENV_VAR: &str = "LOCALHOST_RPC_URL";
const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";
const ARTIFACTS_DIR_ENV_VAR: &str = "ARTIFACTS_DIR";

pub const SEPOLIA_NETWORK: &str = "sepolia";
pub const LOCALHOST_NETWORK: &str = "localhost";

const SEPOLIA_CHAIN_ID: u64 = 11155111;
const LOCALHOST_CHAIN_ID: u64 = 31337;

const DEFAULT_LOCALHOST_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

const SOLC_VERSION: &str = "0.8.27";
/// Low runs value favours smaller bytecode over cheaper calls
const OPTIMIZER_RUNS: u32 = 200;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolidityConfig {
    pub version: String,
    pub optimizer: OptimizerSettings,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub url: String,
    /// hex private keys. empty when no key is configured, in which case
    /// connecting a signer fails rather than loading the config
    pub accounts: Vec<String>,
    pub chain_id: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EtherscanConfig {
    /// network name -> API key
    pub api_key: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourcifyConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeployConfig {
    pub solidity: SolidityConfig,
    pub networks: BTreeMap<String, NetworkConfig>,
    pub etherscan: EtherscanConfig,
    pub sourcify: SourcifyConfig,
    pub artifacts_dir: PathBuf,
}

impl DeployConfig {
    /// load from `.env` (if any) and the process env. missing values default to empty
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let private_key = var(PRIVATE_KEY_ENV_VAR);
        let accounts = if private_key.is_empty() {
            vec![]
        } else {
            vec![private_key]
        };

        let mut networks = BTreeMap::new();
        networks.insert(
            SEPOLIA_NETWORK.to_owned(),
            NetworkConfig {
                url: var(SEPOLIA_RPC_URL_ENV_VAR),
                accounts: accounts.clone(),
                chain_id: SEPOLIA_CHAIN_ID,
            },
        );
        networks.insert(
            LOCALHOST_NETWORK.to_owned(),
            NetworkConfig {
                url: lookup(LOCALHOST_RPC_URL_ENV_VAR)
                    .unwrap_or_else(|| DEFAULT_LOCALHOST_RPC_URL.to_owned()),
                accounts,
                chain_id: LOCALHOST_CHAIN_ID,
            },
        );

        let mut api_key = BTreeMap::new();
        api_key.insert(SEPOLIA_NETWORK.to_owned(), var(ETHERSCAN_API_KEY_ENV_VAR));

        let artifacts_dir = lookup(ARTIFACTS_DIR_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_ARTIFACTS_DIR.to_owned())
            .into();

        Self {
            solidity: SolidityConfig {
                version: SOLC_VERSION.to_owned(),
                optimizer: OptimizerSettings {
                    enabled: true,
                    runs: OPTIMIZER_RUNS,
                },
            },
            networks,
            etherscan: EtherscanConfig { api_key },
            sourcify: SourcifyConfig { enabled: true },
            artifacts_dir,
        }
    }

    pub fn network(&self, name: &str) -> anyhow::Result<&NetworkConfig> {
        self.networks.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.networks.keys().map(String::as_str).collect();
            anyhow!("Unknown network '{name}', expected one of {known:?}")
        })
    }
}
