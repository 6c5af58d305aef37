//! Typed binding for a deployed EntitlementChecker
//!
//! The contract surface is split into three roles sharing one provider:
//! - `EntitlementCheckerCaller` for view methods
//! - `EntitlementCheckerTransactor` for transactions
//! - `EntitlementCheckerFilterer` for logs
//!
//! `EntitlementChecker` bundles all three, and `CheckerSession` pins the
//! per-call options so callers can drop the `opts` argument.

mod caller;
mod filterer;
mod registration;
mod session;
mod transactor;
mod watch;

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;

pub use caller::{list_nodes, EntitlementCheckerCaller, NodeDirectory};
pub use filterer::{EntitlementCheckerFilterer, DEFAULT_POLL_INTERVAL};
pub use registration::{ensure_node_registered, Registration, REGISTER_GAS_FLOOR};
pub use session::CheckerSession;
pub use transactor::{confirm, EntitlementCheckerTransactor, PendingTx};
pub use watch::{EventWatch, WatchItem};

use crate::bindings::metadata;
use crate::domain::checker::{CallOpts, CheckerError, TransactOpts};
use crate::infrastructure::ethereum::Connection;

/// Caller, transactor and filterer bound to one contract address
#[derive(Clone)]
pub struct EntitlementChecker {
    pub caller: EntitlementCheckerCaller,
    pub transactor: EntitlementCheckerTransactor,
    pub filterer: EntitlementCheckerFilterer,
}

impl EntitlementChecker {
    pub fn new(address: Address, provider: DynProvider, subscriptions: bool) -> Self {
        Self {
            caller: EntitlementCheckerCaller::new(address, provider.clone()),
            transactor: EntitlementCheckerTransactor::new(address, provider.clone()),
            filterer: EntitlementCheckerFilterer::new(address, provider, subscriptions),
        }
    }

    /// Bind to `address` over an existing connection
    pub fn connect(address: Address, connection: &Connection) -> Self {
        Self::new(address, connection.provider.clone(), connection.subscriptions)
    }

    pub fn address(&self) -> Address {
        self.caller.address()
    }

    pub fn session(&self, call_opts: CallOpts, transact_opts: TransactOpts) -> CheckerSession {
        CheckerSession::new(self.clone(), call_opts, transact_opts)
    }
}

/// Deploy a fresh EntitlementChecker from the embedded bytecode.
///
/// Waits for the deployment receipt and binds to the created address.
pub async fn deploy(connection: &Connection, opts: &TransactOpts) -> Result<EntitlementChecker, CheckerError> {
    let tx = TransactionRequest::default().with_deploy_code(metadata().bytecode.clone());
    let tx = transactor::request_with_opts(tx, opts);

    let pending = connection.provider.send_transaction(tx).await?;
    tracing::info!(tx = %pending.tx_hash(), "deployment submitted");

    let receipt = confirm(pending).await?;
    let address = receipt
        .contract_address
        .ok_or(CheckerError::MissingContractAddress)?;
    tracing::info!(%address, "EntitlementChecker deployed");

    Ok(EntitlementChecker::connect(address, connection))
}
