//! ABI registry - method, event, and error signatures keyed by selector/topic

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A function, event, or error parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Canonical Solidity type (e.g., "address", "uint256", "address[]")
    pub kind: String,
    /// Event parameters only: carried in a topic rather than the data
    #[serde(default)]
    pub indexed: bool,
}

/// A function signature with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// 4-byte function selector
    pub selector: [u8; 4],
    pub name: String,
    /// Full signature string (e.g., "registerNode(address)")
    pub signature: String,
    pub inputs: Vec<ParamSpec>,
    pub outputs: Vec<ParamSpec>,
    /// "view", "nonpayable", "payable", or "pure"
    pub mutability: String,
}

impl FunctionSignature {
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// An event signature; the topic is keccak256 of the signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSignature {
    pub topic: [u8; 32],
    pub name: String,
    pub signature: String,
    pub inputs: Vec<ParamSpec>,
    pub anonymous: bool,
}

impl EventSignature {
    pub fn topic_hex(&self) -> String {
        format!("0x{}", hex::encode(self.topic))
    }
}

/// A custom error signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSignature {
    pub selector: [u8; 4],
    pub name: String,
    pub signature: String,
    pub inputs: Vec<ParamSpec>,
}

impl ErrorSignature {
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// Selector/topic table for one contract
#[derive(Debug, Default, Clone)]
pub struct AbiRegistry {
    functions: BTreeMap<[u8; 4], FunctionSignature>,
    events: BTreeMap<[u8; 32], EventSignature>,
    errors: BTreeMap<[u8; 4], ErrorSignature>,
}

impl AbiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function signature
    ///
    /// Note: First function for a given selector wins (no overwrite)
    pub fn insert(&mut self, function: FunctionSignature) {
        self.functions.entry(function.selector).or_insert(function);
    }

    pub fn insert_event(&mut self, event: EventSignature) {
        self.events.entry(event.topic).or_insert(event);
    }

    pub fn insert_error(&mut self, error: ErrorSignature) {
        self.errors.entry(error.selector).or_insert(error);
    }

    /// Look up a function by selector
    pub fn lookup(&self, selector: [u8; 4]) -> Option<&FunctionSignature> {
        self.functions.get(&selector)
    }

    /// Look up a function by selector hex string (e.g., "0x672d7a0d")
    pub fn lookup_hex(&self, selector_hex: &str) -> Option<&FunctionSignature> {
        let selector: [u8; 4] = parse_fixed_hex(selector_hex)?;
        self.lookup(selector)
    }

    /// Look up a function by name; the checker ABI has no overloads
    pub fn lookup_name(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.values().find(|function| function.name == name)
    }

    pub fn lookup_event(&self, topic: [u8; 32]) -> Option<&EventSignature> {
        self.events.get(&topic)
    }

    pub fn lookup_error(&self, selector: [u8; 4]) -> Option<&ErrorSignature> {
        self.errors.get(&selector)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.events.is_empty() && self.errors.is_empty()
    }

    /// Functions ordered by selector
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.functions.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &EventSignature> {
        self.events.values()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorSignature> {
        self.errors.values()
    }
}

fn parse_fixed_hex<const N: usize>(value: &str) -> Option<[u8; N]> {
    let normalized = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if normalized.len() != N * 2 {
        return None;
    }

    hex::decode(normalized).ok()?.try_into().ok()
}
