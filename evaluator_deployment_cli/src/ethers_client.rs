use std::sync::Arc;

use anyhow::{anyhow, Context};
use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{Signer, Wallet},
};
use evaluator_deployment::config::NetworkConfig;

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

pub fn get_writer_ethers_client(network: &NetworkConfig) -> anyhow::Result<Arc<EtherSigner>> {
    let private_key = network
        .accounts
        .first()
        .ok_or_else(|| anyhow!("No account configured for this network, set PRIVATE_KEY"))?;

    let wallet = private_key
        .parse::<Wallet<SigningKey>>()
        .context("Could not parse PRIVATE_KEY")?
        .with_chain_id(network.chain_id);

    let provider = Provider::<Http>::try_from(network.url.as_str())
        .with_context(|| format!("Invalid RPC url '{}'", network.url))?;

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}
