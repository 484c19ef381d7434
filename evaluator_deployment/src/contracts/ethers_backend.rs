use std::sync::Arc;

use anyhow::{anyhow, Context};
use ethers::{
    abi::Token,
    providers::Middleware,
    types::{Address, TransactionReceipt, TransactionRequest, H256, U64},
};

use crate::{
    artifacts::{ArtifactStore, ContractBlueprint},
    backend::{DeployedContract, DeploymentBackend},
};

/// [DeploymentBackend] submitting through an ethers middleware stack.
/// `M` should carry the signer.
pub struct EthersBackend<M> {
    client: Arc<M>,
    artifacts: ArtifactStore,
}

impl<M> EthersBackend<M>
where
    M: Middleware + 'static,
{
    pub fn new(client: Arc<M>, artifacts: ArtifactStore) -> Self {
        Self { client, artifacts }
    }

    /// Send `tx` and wait for it to be mined. A dropped or reverted tx is an error.
    async fn submit(
        &self,
        tx: TransactionRequest,
        what: &str,
    ) -> anyhow::Result<TransactionReceipt> {
        let receipt = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .await?
            .ok_or_else(|| anyhow!("{what} was dropped before being mined"))?;

        if receipt.status != Some(U64::from(1)) {
            return Err(anyhow!("{what} reverted in tx {:?}", receipt.transaction_hash));
        }

        Ok(receipt)
    }
}

impl<M> DeploymentBackend for EthersBackend<M>
where
    M: Middleware + 'static,
{
    fn contract_factory(&self, name: &str) -> anyhow::Result<ContractBlueprint> {
        self.artifacts.blueprint(name)
    }

    async fn deploy(
        &self,
        blueprint: &ContractBlueprint,
        constructor_args: Vec<Token>,
    ) -> anyhow::Result<Address> {
        let code = blueprint.bytecode.to_vec();
        let data = match (blueprint.abi.constructor(), constructor_args.is_empty()) {
            (None, true) => code,
            (None, false) => {
                return Err(anyhow!(
                    "{} has no constructor but was given arguments",
                    blueprint.name
                ))
            }
            (Some(constructor), _) => constructor
                .encode_input(code, &constructor_args)
                .with_context(|| format!("Bad constructor arguments for {}", blueprint.name))?,
        };

        // no `to`: contract creation
        let tx = TransactionRequest::new().data(data);
        let receipt = self
            .submit(tx, &format!("Deployment of {}", blueprint.name))
            .await?;

        tracing::debug!(
            contract = %blueprint.name,
            tx = ?receipt.transaction_hash,
            block = ?receipt.block_number,
            "Deployment mined"
        );

        receipt.contract_address.ok_or_else(|| {
            anyhow!(
                "Deployment of {} mined in tx {:?} without a contract address",
                blueprint.name,
                receipt.transaction_hash
            )
        })
    }

    async fn send(
        &self,
        contract: &DeployedContract,
        method: &str,
        args: Vec<Token>,
    ) -> anyhow::Result<H256> {
        let data = contract
            .blueprint
            .abi
            .function(method)
            .with_context(|| format!("{} has no method {method}", contract.blueprint.name))?
            .encode_input(&args)
            .with_context(|| format!("Bad arguments for {}.{method}", contract.blueprint.name))?;

        let tx = TransactionRequest::new().to(contract.address).data(data);
        let receipt = self
            .submit(tx, &format!("{}.{method}", contract.blueprint.name))
            .await?;

        Ok(receipt.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Arc, time::Duration};

    use ethers::{
        abi::{Abi, Token},
        providers::{MockProvider, Provider},
        types::{Address, Bytes, Transaction, TransactionReceipt, H256, U256, U64},
    };

    use super::EthersBackend;
    use crate::{
        artifacts::{ArtifactStore, ContractBlueprint},
        backend::{DeployedContract, DeploymentBackend},
        config::DeployConfig,
    };

    fn mocked_backend() -> (EthersBackend<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let provider = provider.interval(Duration::from_millis(1));
        let conf = DeployConfig::from_lookup(|_| None);
        let artifacts = ArtifactStore::new(
            env::temp_dir().join(format!("no-artifacts-{}", uuid::Uuid::new_v4())),
            conf.solidity,
        );
        (EthersBackend::new(Arc::new(provider), artifacts), mock)
    }

    fn blueprint_without_constructor() -> ContractBlueprint {
        ContractBlueprint {
            name: String::from("Evaluator"),
            abi: serde_json::from_str::<Abi>("[]").unwrap(),
            bytecode: Bytes::from(vec![0x60, 0x80]),
        }
    }

    fn blueprint_with_set_teacher() -> ContractBlueprint {
        let abi = r#"[{
            "type": "function",
            "name": "setTeacher",
            "inputs": [
                { "name": "teacher", "type": "address" },
                { "name": "isTeacher", "type": "bool" }
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        }]"#;
        ContractBlueprint {
            name: String::from("ERC20Points"),
            abi: serde_json::from_str::<Abi>(abi).unwrap(),
            bytecode: Bytes::from(vec![0x60, 0x80]),
        }
    }

    /// Queue the node's answers for one submitted tx. The mock answers the most
    /// recently pushed response first, so they go in in reverse request order:
    /// gas price, gas estimate, tx hash, the tx lookup, then the receipt.
    fn push_submission(
        mock: &MockProvider,
        tx: Option<Transaction>,
        receipt: Option<TransactionReceipt>,
    ) {
        let tx_hash = H256::repeat_byte(0xaa);
        if let Some(receipt) = receipt {
            mock.push::<TransactionReceipt, _>(receipt).unwrap();
        }
        mock.push::<Option<Transaction>, _>(tx).unwrap();
        mock.push::<H256, _>(tx_hash).unwrap();
        mock.push::<U256, _>(U256::from(21_000u64)).unwrap();
        mock.push::<U256, _>(U256::from(1_000_000_000u64)).unwrap();
    }

    fn mined_tx() -> Transaction {
        Transaction {
            hash: H256::repeat_byte(0xaa),
            block_number: Some(U64::from(1)),
            ..Default::default()
        }
    }

    fn receipt(status: u64, contract_address: Option<Address>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: H256::repeat_byte(0xaa),
            block_number: Some(U64::from(1)),
            status: Some(U64::from(status)),
            contract_address,
            ..Default::default()
        }
    }

    #[test]
    fn test_contract_factory_reads_artifacts() {
        let (backend, _mock) = mocked_backend();

        let err = backend.contract_factory("ERC20Points").unwrap_err();
        assert!(err.to_string().contains("ERC20Points"));
    }

    #[tokio::test]
    async fn test_constructor_args_checked_before_submitting() {
        let (backend, _mock) = mocked_backend();

        let res = backend
            .deploy(
                &blueprint_without_constructor(),
                vec![Token::Address(Address::random())],
            )
            .await;

        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_deploy_returns_mined_contract_address() {
        let (backend, mock) = mocked_backend();
        let deployed_at = Address::repeat_byte(0x07);
        push_submission(&mock, Some(mined_tx()), Some(receipt(1, Some(deployed_at))));

        let address = backend
            .deploy(&blueprint_without_constructor(), vec![])
            .await
            .unwrap();

        assert_eq!(address, deployed_at);
    }

    #[tokio::test]
    async fn test_reverted_deployment_is_an_error() {
        let (backend, mock) = mocked_backend();
        // nodes still report the would-be address of a failed creation
        push_submission(
            &mock,
            Some(mined_tx()),
            Some(receipt(0, Some(Address::repeat_byte(0x07)))),
        );

        let err = backend
            .deploy(&blueprint_without_constructor(), vec![])
            .await
            .unwrap_err();

        let err = err.to_string();
        assert!(err.contains("Evaluator"));
        assert!(err.contains("reverted"));
    }

    #[tokio::test]
    async fn test_send_returns_mined_tx_hash() {
        let (backend, mock) = mocked_backend();
        push_submission(&mock, Some(mined_tx()), Some(receipt(1, None)));
        let contract = DeployedContract {
            blueprint: blueprint_with_set_teacher(),
            address: Address::random(),
        };

        let tx = backend
            .send(
                &contract,
                "setTeacher",
                vec![Token::Address(Address::random()), Token::Bool(true)],
            )
            .await
            .unwrap();

        assert_eq!(tx, H256::repeat_byte(0xaa));
    }

    #[tokio::test]
    async fn test_reverted_send_is_an_error() {
        let (backend, mock) = mocked_backend();
        push_submission(&mock, Some(mined_tx()), Some(receipt(0, None)));
        let contract = DeployedContract {
            blueprint: blueprint_with_set_teacher(),
            address: Address::random(),
        };

        let err = backend
            .send(
                &contract,
                "setTeacher",
                vec![Token::Address(Address::random()), Token::Bool(true)],
            )
            .await
            .unwrap_err();

        let err = err.to_string();
        assert!(err.contains("ERC20Points.setTeacher"));
        assert!(err.contains("reverted"));
    }

    #[tokio::test]
    async fn test_dropped_send_is_an_error() {
        let (backend, mock) = mocked_backend();
        // the node no longer knows the tx
        push_submission(&mock, None, None);
        let contract = DeployedContract {
            blueprint: blueprint_with_set_teacher(),
            address: Address::random(),
        };

        let err = backend
            .send(
                &contract,
                "setTeacher",
                vec![Token::Address(Address::random()), Token::Bool(true)],
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("dropped"));
    }

    #[tokio::test]
    async fn test_unknown_method_fails_before_submitting() {
        let (backend, _mock) = mocked_backend();
        let contract = DeployedContract {
            blueprint: blueprint_without_constructor(),
            address: Address::random(),
        };

        let err = backend
            .send(&contract, "setRandomValuesStore", vec![])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("setRandomValuesStore"));
    }
}
