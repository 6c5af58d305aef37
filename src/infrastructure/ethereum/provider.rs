//! Provider configuration and alloy provider construction
//!
//! Every transport is erased to a `DynProvider` so the checker roles can share
//! one concrete provider type regardless of how the node is reached.

use std::path::PathBuf;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Pick a transport from the shape of the endpoint string
    pub fn from_endpoint(endpoint: &str) -> Self {
        let endpoint = endpoint.trim();
        if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
            return ProviderConfig::WebSocket(endpoint.to_string());
        }
        #[cfg(unix)]
        if endpoint.ends_with(".ipc") || endpoint.starts_with('/') {
            return ProviderConfig::Ipc(PathBuf::from(endpoint));
        }
        ProviderConfig::Http(endpoint.to_string())
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }

    /// Whether the transport supports `eth_subscribe`
    pub fn supports_subscriptions(&self) -> bool {
        match self {
            ProviderConfig::Http(_) => false,
            ProviderConfig::WebSocket(_) => true,
            #[cfg(unix)]
            ProviderConfig::Ipc(_) => true,
        }
    }
}

/// A connected provider plus what we know about how it was built
#[derive(Clone)]
pub struct Connection {
    pub provider: DynProvider,
    pub endpoint: String,
    pub subscriptions: bool,
    /// Address of the local signer, if one was configured
    pub signer: Option<Address>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("subscriptions", &self.subscriptions)
            .field("signer", &self.signer)
            .finish()
    }
}

// Builds the same provider with or without a wallet filler
macro_rules! build_provider {
    ($wallet:expr, |$builder:ident| $connect:expr) => {
        match $wallet {
            Some(wallet) => {
                let $builder = ProviderBuilder::new().wallet(wallet);
                ($connect).erased()
            }
            None => {
                let $builder = ProviderBuilder::new();
                ($connect).erased()
            }
        }
    };
}

/// Create a provider from configuration, optionally signing with `signer`
pub async fn connect(config: ProviderConfig, signer: Option<PrivateKeySigner>) -> Result<Connection> {
    let signer_address = signer.as_ref().map(|s| s.address());
    let wallet = signer.map(EthereumWallet::from);
    let subscriptions = config.supports_subscriptions();
    let endpoint = config.display();

    let provider = match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            build_provider!(wallet, |builder| builder.connect_http(rpc_url))
        }
        ProviderConfig::WebSocket(url) => {
            build_provider!(wallet, |builder| builder
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?)
        }
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc_path = path.to_string_lossy().to_string();
            build_provider!(wallet, |builder| builder
                .connect_ipc(IpcConnect::new(ipc_path))
                .await
                .context("Failed to create IPC provider")?)
        }
    };

    tracing::debug!(%endpoint, subscriptions, signer = ?signer_address, "connected provider");

    Ok(Connection {
        provider,
        endpoint,
        subscriptions,
        signer: signer_address,
    })
}

/// Read a hex private key from the environment variable `var`.
///
/// An unset variable is not an error: the connection is then read-only.
pub fn signer_from_env(var: &str) -> Result<Option<PrivateKeySigner>> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => {
            let signer = key
                .trim()
                .parse::<PrivateKeySigner>()
                .with_context(|| format!("{var} does not hold a valid private key"))?;
            Ok(Some(signer))
        }
        _ => Ok(None),
    }
}
