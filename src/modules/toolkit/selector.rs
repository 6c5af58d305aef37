//! Selector and topic listing for the checker ABI

use alloy::primitives::keccak256;

use super::ToolResult;
use crate::domain::abi::AbiRegistry;

/// Every function selector, event topic and error selector in `registry`
pub fn selectors(registry: &AbiRegistry) -> ToolResult {
    let mut result = ToolResult::new("EntitlementChecker ABI");
    for function in registry.functions() {
        result = result.add(function.selector_hex(), format!("{} [{}]", function.signature, function.mutability));
    }
    for event in registry.events() {
        result = result.add(event.topic_hex(), format!("event {}", event.signature));
    }
    for error in registry.errors() {
        result = result.add(error.selector_hex(), format!("error {}", error.signature));
    }
    result
}

/// Compute the selector of an arbitrary signature
pub fn selector(signature: &str) -> ToolResult {
    let normalized = normalize_signature(signature);
    let hash = keccak256(normalized.as_bytes());
    ToolResult::new("Selector")
        .add("signature", normalized)
        .add("selector", format!("0x{}", hex::encode(&hash[..4])))
        .add("topic", format!("0x{}", hex::encode(hash)))
}

fn normalize_signature(sig: &str) -> String {
    // Remove returns clause if present
    let sig = match sig.find("returns") {
        Some(pos) => sig[..pos].trim(),
        None => sig.trim(),
    };
    sig.replace(' ', "")
}
