//! State-mutating access to the checker contract

use alloy::contract::{CallBuilder, CallDecoder};
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};

use crate::bindings::{EntitlementChecker, EntitlementCheckerInstance};
use crate::domain::checker::{CheckerError, TransactOpts};

/// A submitted transaction that has not been confirmed yet
pub type PendingTx = PendingTransactionBuilder<Ethereum>;

pub(crate) fn with_transact_opts<P, D>(mut call: CallBuilder<P, D>, opts: &TransactOpts) -> CallBuilder<P, D>
where
    P: Provider,
    D: CallDecoder,
{
    if let Some(from) = opts.from {
        call = call.from(from);
    }
    if let Some(value) = opts.value {
        call = call.value(value);
    }
    if let Some(gas) = opts.gas_limit {
        call = call.gas(gas);
    }
    if let Some(nonce) = opts.nonce {
        call = call.nonce(nonce);
    }
    if let Some(fee) = opts.max_fee_per_gas {
        call = call.max_fee_per_gas(fee);
    }
    if let Some(fee) = opts.max_priority_fee_per_gas {
        call = call.max_priority_fee_per_gas(fee);
    }
    call
}

pub(crate) fn request_with_opts(mut tx: TransactionRequest, opts: &TransactOpts) -> TransactionRequest {
    if let Some(from) = opts.from {
        tx = tx.with_from(from);
    }
    if let Some(value) = opts.value {
        tx = tx.with_value(value);
    }
    if let Some(gas) = opts.gas_limit {
        tx = tx.with_gas_limit(gas);
    }
    if let Some(nonce) = opts.nonce {
        tx = tx.with_nonce(nonce);
    }
    if let Some(fee) = opts.max_fee_per_gas {
        tx = tx.with_max_fee_per_gas(fee);
    }
    if let Some(fee) = opts.max_priority_fee_per_gas {
        tx = tx.with_max_priority_fee_per_gas(fee);
    }
    tx
}

/// Wait for `pending` to be mined; a failed status is an error
pub async fn confirm(pending: PendingTx) -> Result<TransactionReceipt, CheckerError> {
    let tx_hash = *pending.tx_hash();
    let receipt = pending.get_receipt().await?;
    if !receipt.status() {
        tracing::warn!(%tx_hash, "transaction reverted on chain");
        return Err(CheckerError::TransactionFailed(tx_hash));
    }
    tracing::debug!(%tx_hash, block = ?receipt.block_number, gas_used = receipt.gas_used, "transaction confirmed");
    Ok(receipt)
}

/// Transaction methods of the checker
#[derive(Clone)]
pub struct EntitlementCheckerTransactor {
    pub(super) instance: EntitlementCheckerInstance,
}

impl EntitlementCheckerTransactor {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            instance: EntitlementChecker::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    pub async fn entitlement_checker_init(&self, opts: &TransactOpts) -> Result<PendingTx, CheckerError> {
        let call = self.instance.__EntitlementChecker_init();
        Ok(with_transact_opts(call, opts).send().await?)
    }

    pub async fn register_node(&self, opts: &TransactOpts, node: Address) -> Result<PendingTx, CheckerError> {
        let call = self.instance.registerNode(node);
        Ok(with_transact_opts(call, opts).send().await?)
    }

    pub async fn unregister_node(&self, opts: &TransactOpts, node: Address) -> Result<PendingTx, CheckerError> {
        let call = self.instance.unregisterNode(node);
        Ok(with_transact_opts(call, opts).send().await?)
    }

    pub async fn request_entitlement_check(
        &self,
        opts: &TransactOpts,
        wallet: Address,
        transaction_id: B256,
        role_id: U256,
        nodes: Vec<Address>,
    ) -> Result<PendingTx, CheckerError> {
        let call = self
            .instance
            .requestEntitlementCheck(wallet, transaction_id, role_id, nodes);
        Ok(with_transact_opts(call, opts).send().await?)
    }

    /// Payable; `opts.value` funds the check
    pub async fn request_entitlement_check_v2(
        &self,
        opts: &TransactOpts,
        wallet: Address,
        transaction_id: B256,
        request_id: U256,
        extra_data: Bytes,
    ) -> Result<PendingTx, CheckerError> {
        let call = self
            .instance
            .requestEntitlementCheckV2(wallet, transaction_id, request_id, extra_data);
        Ok(with_transact_opts(call, opts).send().await?)
    }

    /// Send arbitrary calldata to the contract
    pub async fn transact_raw(&self, opts: &TransactOpts, calldata: Bytes) -> Result<PendingTx, CheckerError> {
        let tx = TransactionRequest::default()
            .with_to(self.address())
            .with_input(calldata);
        let pending = self
            .instance
            .provider()
            .send_transaction(request_with_opts(tx, opts))
            .await?;
        Ok(pending)
    }

    /// Plain value transfer; hits the fallback/receive path
    pub async fn transfer(&self, opts: &TransactOpts) -> Result<PendingTx, CheckerError> {
        self.transact_raw(opts, Bytes::new()).await
    }

    pub async fn estimate_gas(&self, opts: &TransactOpts, calldata: Bytes) -> Result<u64, CheckerError> {
        let tx = TransactionRequest::default()
            .with_to(self.address())
            .with_input(calldata);
        let gas = self
            .instance
            .provider()
            .estimate_gas(request_with_opts(tx, opts))
            .await?;
        Ok(gas)
    }

    /// Dry-run `registerNode` so known reverts surface before anything is sent
    pub(super) async fn simulate_register_node(&self, opts: &TransactOpts, node: Address) -> Result<(), CheckerError> {
        let mut call = self.instance.registerNode(node);
        if let Some(from) = opts.from {
            call = call.from(from);
        }
        call.call().await?;
        Ok(())
    }
}
