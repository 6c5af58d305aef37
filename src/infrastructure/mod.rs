//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy provider construction for HTTP, WebSocket and IPC endpoints
//! - The typed EntitlementChecker binding built on those providers
//! - ABI loading and dynamic decoding using alloy-dyn-abi

pub mod abi;
pub mod checker;
pub mod ethereum;

pub use abi::{AbiLoader, AlloyAbiDecoder};
pub use checker::{deploy, ensure_node_registered, EntitlementChecker, Registration};
pub use ethereum::{connect, Connection, ProviderConfig};
