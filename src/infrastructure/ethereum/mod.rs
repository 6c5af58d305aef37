//! Ethereum infrastructure - Alloy provider construction

mod provider;

pub use provider::{connect, signer_from_env, Connection, ProviderConfig};
