use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;

use crate::config::{OptimizerSettings, SolidityConfig};

/// Compiled template a contract instance is created from
#[derive(Clone, Debug)]
pub struct ContractBlueprint {
    pub name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    abi: Abi,
    bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatDebugFile {
    build_info: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_version: String,
    input: BuildInfoInput,
}

#[derive(Deserialize)]
struct BuildInfoInput {
    settings: BuildInfoSettings,
}

#[derive(Deserialize)]
struct BuildInfoSettings {
    optimizer: Option<OptimizerSettings>,
}

impl ContractBlueprint {
    /// parse a hardhat artifact (`{ contractName, abi, bytecode, .. }`)
    pub fn from_artifact_json(json: &str) -> anyhow::Result<Self> {
        let artifact: HardhatArtifact = serde_json::from_str(json)?;

        if artifact.bytecode.is_empty() {
            return Err(anyhow!(
                "Artifact for {} has no bytecode (abstract contract or interface?)",
                artifact.contract_name
            ));
        }

        Ok(Self {
            name: artifact.contract_name,
            abi: artifact.abi,
            bytecode: artifact.bytecode,
        })
    }
}

/// Reads compiled contracts out of a hardhat-style `artifacts/` directory:
/// `<root>/contracts/<Name>.sol/<Name>.json`
pub struct ArtifactStore {
    root: PathBuf,
    solidity: SolidityConfig,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, solidity: SolidityConfig) -> Self {
        Self {
            root: root.into(),
            solidity,
        }
    }

    fn artifact_path(&self, name: &str) -> PathBuf {
        self.root
            .join("contracts")
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"))
    }

    pub fn blueprint(&self, name: &str) -> anyhow::Result<ContractBlueprint> {
        let path = self.artifact_path(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Could not read artifact of {name} at {}", path.display()))?;
        let blueprint = ContractBlueprint::from_artifact_json(&json)
            .with_context(|| format!("Malformed artifact of {name} at {}", path.display()))?;

        self.check_compiler_settings(name, &path);

        Ok(blueprint)
    }

    /// Warn when the artifact was built with different compiler settings than configured.
    /// Best effort: missing or unreadable debug/build-info files are skipped.
    fn check_compiler_settings(&self, name: &str, artifact_path: &Path) {
        let Some(build_info) = read_build_info(artifact_path) else {
            tracing::debug!(contract = name, "No build info found, skipping compiler check");
            return;
        };

        let expected = &self.solidity;
        if build_info.solc_version != expected.version {
            tracing::warn!(
                contract = name,
                built_with = %build_info.solc_version,
                configured = %expected.version,
                "Artifact compiled with a different solc version"
            );
        }

        if let Some(optimizer) = build_info.input.settings.optimizer {
            if optimizer != expected.optimizer {
                tracing::warn!(
                    contract = name,
                    built_with = ?optimizer,
                    configured = ?expected.optimizer,
                    "Artifact compiled with different optimizer settings"
                );
            }
        }
    }
}

fn read_build_info(artifact_path: &Path) -> Option<BuildInfo> {
    let dbg_path = artifact_path.with_extension("dbg.json");
    let dbg: HardhatDebugFile = serde_json::from_str(&fs::read_to_string(&dbg_path).ok()?).ok()?;

    // build info path is relative to the dbg file
    let build_info_path = dbg_path.parent()?.join(dbg.build_info);
    serde_json::from_str(&fs::read_to_string(build_info_path).ok()?).ok()
}
