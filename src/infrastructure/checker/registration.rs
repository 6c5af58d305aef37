//! Idempotent node registration

use alloy::primitives::Address;
use alloy::rpc::types::TransactionReceipt;

use super::transactor::confirm;
use super::EntitlementChecker;
use crate::domain::checker::{CheckerError, ContractRevert, TransactOpts};

/// Minimum gas limit for `registerNode`
pub const REGISTER_GAS_FLOOR: u64 = 250_000;

/// Outcome of [`ensure_node_registered`]
#[derive(Debug, Clone)]
pub enum Registration {
    AlreadyRegistered,
    Registered(TransactionReceipt),
}

fn already_registered(err: &CheckerError) -> bool {
    err.is_revert(ContractRevert::NodeAlreadyRegistered)
}

/// Register `node` unless the contract already knows it.
///
/// The call is simulated first. An explicit gas limit skips estimation, so
/// without the dry run an already-registered node would only show up as a
/// failed receipt.
pub async fn ensure_node_registered(
    checker: &EntitlementChecker,
    node: Address,
    opts: &TransactOpts,
) -> Result<Registration, CheckerError> {
    let transactor = &checker.transactor;
    let opts = opts.with_gas_floor(REGISTER_GAS_FLOOR);

    match transactor.simulate_register_node(&opts, node).await {
        Err(err) if already_registered(&err) => {
            tracing::info!(%node, "node already registered");
            return Ok(Registration::AlreadyRegistered);
        }
        Err(err) => {
            tracing::error!(%node, error = %err, "registerNode simulation failed");
            return Err(err);
        }
        Ok(()) => {}
    }

    let pending = match transactor.register_node(&opts, node).await {
        Ok(pending) => pending,
        Err(err) if already_registered(&err) => {
            tracing::info!(%node, "node already registered");
            return Ok(Registration::AlreadyRegistered);
        }
        Err(err) => return Err(err),
    };
    tracing::info!(%node, tx = %pending.tx_hash(), "node registration submitted");

    let receipt = confirm(pending).await?;
    tracing::info!(%node, block = ?receipt.block_number, "node registered");
    Ok(Registration::Registered(receipt))
}
