//! Contract metadata: the ABI JSON and deployment bytecode

use std::sync::OnceLock;

use alloy::primitives::Bytes;
use alloy_json_abi::{ContractObject, JsonAbi};
use anyhow::{Context, Result};

/// Raw artifact, identical to the file `sol!` reads at compile time
const ARTIFACT: &str = include_str!("../../abi/EntitlementChecker.json");

/// Parsed ABI plus the creation bytecode
#[derive(Debug, Clone)]
pub struct ContractMetadata {
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractMetadata {
    fn parse(artifact: &str) -> Result<Self> {
        let object: ContractObject =
            serde_json::from_str(artifact).context("Invalid contract artifact")?;
        let abi = object.abi.context("Artifact has no ABI")?;
        let bytecode = object.bytecode.context("Artifact has no bytecode")?;
        Ok(Self { abi, bytecode })
    }

    /// ABI as compact JSON, the same shape the node tooling expects
    pub fn abi_json(&self) -> String {
        serde_json::to_string(&self.abi).unwrap_or_default()
    }

    pub fn bytecode_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytecode))
    }
}

/// Metadata for `EntitlementChecker`, parsed on first use.
///
/// The artifact is compiled into the binary, so a parse failure is a build
/// defect and not a runtime condition.
pub fn metadata() -> &'static ContractMetadata {
    static METADATA: OnceLock<ContractMetadata> = OnceLock::new();
    METADATA.get_or_init(|| {
        ContractMetadata::parse(ARTIFACT).unwrap_or_else(|err| panic!("{err:#}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_parses() {
        let meta = metadata();
        assert_eq!(meta.abi.functions().count(), 10);
        assert_eq!(meta.abi.events().count(), 7);
        assert_eq!(meta.abi.errors().count(), 13);
        assert!(meta.bytecode_hex().starts_with("0x6080604052"));
    }

    #[test]
    fn test_abi_json_round_trips_function_names() {
        let json = metadata().abi_json();
        assert!(json.contains("requestEntitlementCheckV2"));
        assert!(json.contains("__EntitlementChecker_init"));
    }

    #[test]
    fn test_parse_rejects_missing_bytecode() {
        let err = ContractMetadata::parse(r#"{"abi": []}"#).unwrap_err();
        assert!(err.to_string().contains("bytecode"));
    }
}
