use std::io::Write;

use anyhow::Context;
use ethers::types::Address;

use crate::{
    backend::DeploymentBackend,
    contracts::{
        evaluator::EvaluatorContract, points::PointsToken, ERC20_POINTS_CONTRACT,
        EVALUATOR_2_CONTRACT, EVALUATOR_CONTRACT,
    },
    seed::SeedData,
};

/// What a successful run left on chain
#[derive(Clone, Debug)]
pub struct DeploymentReport {
    pub points: Address,
    pub evaluator: Address,
    pub evaluator2: Address,
    pub seed: SeedData,
}

/// Deploy the points token and both evaluators, make the evaluators teachers of the
/// token, then seed both evaluators with the same random values.
///
/// Each address is written to `out` as soon as it is mined, and the seed before it is
/// stored, so a failed run still shows what made it on chain.
///
/// Stops at the first failure. Nothing is rolled back: contracts and roles from earlier
/// steps stay on chain and the error says which step to resume from.
pub async fn deploy_all(
    backend: &impl DeploymentBackend,
    out: &mut impl Write,
) -> anyhow::Result<DeploymentReport> {
    let points_blueprint = backend.contract_factory(ERC20_POINTS_CONTRACT)?;
    let evaluator_blueprint = backend.contract_factory(EVALUATOR_CONTRACT)?;
    let evaluator2_blueprint = backend.contract_factory(EVALUATOR_2_CONTRACT)?;

    tracing::info!("Deploying {ERC20_POINTS_CONTRACT}...");
    let points = PointsToken::deploy(backend, points_blueprint)
        .await
        .with_context(|| format!("Failed deploying {ERC20_POINTS_CONTRACT}"))?;
    // note that debug fmt of address is the full '0x..' hex encoding
    writeln!(out, "PointsERC20 deployed at {:?}", points.address())?;

    // one after the other, so a failure never leaves an unreported creation in flight
    let mut evaluators = Vec::with_capacity(2);
    for blueprint in [evaluator_blueprint, evaluator2_blueprint] {
        let name = blueprint.name.clone();
        tracing::info!("Deploying {name}...");
        let evaluator = EvaluatorContract::deploy(backend, blueprint, points.address())
            .await
            .with_context(|| format!("Failed deploying {name}"))?;
        writeln!(out, "{name} deployed at {:?}", evaluator.address())?;
        evaluators.push(evaluator);
    }

    for teacher in &evaluators {
        let tx = points
            .set_teacher(backend, teacher.address(), true)
            .await
            .with_context(|| {
                format!(
                    "Failed granting teacher role to {} ({:?})",
                    teacher.name(),
                    teacher.address()
                )
            })?;
        tracing::info!(?tx, "{} is now a teacher", teacher.name());
    }

    let seed = SeedData::generate();
    writeln!(out, "{seed}")?;

    for target in &evaluators {
        let tx = target
            .set_random_values_store(backend, &seed)
            .await
            .with_context(|| format!("Failed storing random values in {}", target.name()))?;
        tracing::info!(?tx, "Random values stored in {}", target.name());
    }

    Ok(DeploymentReport {
        points: points.address(),
        evaluator: evaluators[0].address(),
        evaluator2: evaluators[1].address(),
        seed,
    })
}
