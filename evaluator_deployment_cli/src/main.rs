mod ethers_client;

use std::{io, process::ExitCode};

use clap::Parser;
use evaluator_deployment::{
    artifacts::ArtifactStore,
    config::{DeployConfig, SEPOLIA_NETWORK},
    contracts::ethers_backend::EthersBackend,
    deployment::{deploy_all, DeploymentReport},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ethers_client::get_writer_ethers_client;

#[derive(Parser)]
#[command(name = "evaluator-deployment")]
#[command(
    about = "Deploy the points token and both evaluators, then seed the evaluators",
    long_about = None
)]
struct Cli {
    /// Network to deploy to
    #[arg(short, long, env = "DEPLOY_NETWORK", default_value = SEPOLIA_NETWORK)]
    network: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // logs go to stderr, stdout only carries the deployment result
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evaluator_deployment=info,evaluator_deployment_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = DeployConfig::load();

    match run(&cli.network, &config).await {
        Ok(report) => {
            tracing::info!(
                points = ?report.points,
                evaluator = ?report.evaluator,
                evaluator2 = ?report.evaluator2,
                "Deployment complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(network = %cli.network, "Deployment failed");
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(network_name: &str, config: &DeployConfig) -> anyhow::Result<DeploymentReport> {
    let network = config.network(network_name)?;
    tracing::info!(
        network = network_name,
        chain_id = network.chain_id,
        solc = %config.solidity.version,
        artifacts = %config.artifacts_dir.display(),
        "Configuration loaded"
    );

    let has_verification_key = config
        .etherscan
        .api_key
        .get(network_name)
        .is_some_and(|key| !key.is_empty());
    tracing::debug!(
        etherscan = has_verification_key,
        sourcify = config.sourcify.enabled,
        "Verification services"
    );

    let signer = get_writer_ethers_client(network)?;
    tracing::info!(deployer = ?signer.address(), "Deploying from");

    let artifacts = ArtifactStore::new(config.artifacts_dir.clone(), config.solidity.clone());
    let backend = EthersBackend::new(signer, artifacts);

    deploy_all(&backend, &mut io::stdout()).await
}
