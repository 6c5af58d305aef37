//! ABI decoder trait and types

use serde::{Deserialize, Serialize};

use super::FunctionSignature;

/// A decoded function, event, or error argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedArg {
    /// `arg{n}` when the ABI leaves the parameter unnamed
    pub name: String,
    pub kind: String,
    pub value: String,
}

/// Result of decoding a function call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedCall {
    pub function_name: String,
    /// Full function signature (e.g., "registerNode(address)")
    pub signature: String,
    pub arguments: Vec<DecodedArg>,
}

/// Result of decoding an event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub event_name: String,
    pub signature: String,
    pub arguments: Vec<DecodedArg>,
}

/// Result of decoding revert data against the contract's custom errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedError {
    pub error_name: String,
    pub signature: String,
    pub arguments: Vec<DecodedArg>,
}

/// Runtime ABI decoding over the checker registry.
///
/// Used for payloads whose shape is only known at runtime (CLI input, raw
/// logs from a node). Typed paths go through the generated binding instead.
pub trait AbiDecoder: Send + Sync {
    /// Decode calldata (selector included) against a known function
    fn decode_calldata(
        &self,
        function: &FunctionSignature,
        data: &[u8],
    ) -> anyhow::Result<DecodedCall>;

    /// Look up `selector` in the registry and decode; `Ok(None)` if unknown
    fn decode_by_selector(
        &self,
        selector: [u8; 4],
        data: &[u8],
    ) -> anyhow::Result<Option<DecodedCall>>;

    /// Decode revert data (4-byte error selector plus arguments)
    fn decode_revert(&self, data: &[u8]) -> anyhow::Result<Option<DecodedError>>;

    /// Decode a log from its topics and data; `Ok(None)` if topic0 is unknown
    fn decode_log(
        &self,
        topics: &[[u8; 32]],
        data: &[u8],
    ) -> anyhow::Result<Option<DecodedEvent>>;
}
