//! Checker handle with bound call and transaction options

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use super::caller::NodeDirectory;
use super::transactor::PendingTx;
use super::EntitlementChecker;
use crate::domain::checker::{CallOpts, CheckerError, TransactOpts};

/// A checker with fixed call and transact options
#[derive(Clone)]
pub struct CheckerSession {
    checker: EntitlementChecker,
    pub call_opts: CallOpts,
    pub transact_opts: TransactOpts,
}

impl CheckerSession {
    pub fn new(checker: EntitlementChecker, call_opts: CallOpts, transact_opts: TransactOpts) -> Self {
        Self {
            checker,
            call_opts,
            transact_opts,
        }
    }

    pub fn checker(&self) -> &EntitlementChecker {
        &self.checker
    }

    pub async fn get_node_at_index(&self, index: U256) -> Result<Address, CheckerError> {
        self.checker.caller.get_node_at_index(&self.call_opts, index).await
    }

    pub async fn get_node_count(&self) -> Result<U256, CheckerError> {
        self.checker.caller.get_node_count(&self.call_opts).await
    }

    pub async fn get_nodes_by_operator(&self, operator: Address) -> Result<Vec<Address>, CheckerError> {
        self.checker
            .caller
            .get_nodes_by_operator(&self.call_opts, operator)
            .await
    }

    pub async fn get_random_nodes(&self, count: U256) -> Result<Vec<Address>, CheckerError> {
        self.checker.caller.get_random_nodes(&self.call_opts, count).await
    }

    pub async fn is_valid_node(&self, node: Address) -> Result<bool, CheckerError> {
        self.checker.caller.is_valid_node(&self.call_opts, node).await
    }

    pub async fn call_raw(&self, calldata: Bytes) -> Result<Bytes, CheckerError> {
        self.checker.caller.call_raw(&self.call_opts, calldata).await
    }

    pub async fn entitlement_checker_init(&self) -> Result<PendingTx, CheckerError> {
        self.checker
            .transactor
            .entitlement_checker_init(&self.transact_opts)
            .await
    }

    pub async fn register_node(&self, node: Address) -> Result<PendingTx, CheckerError> {
        self.checker
            .transactor
            .register_node(&self.transact_opts, node)
            .await
    }

    pub async fn unregister_node(&self, node: Address) -> Result<PendingTx, CheckerError> {
        self.checker
            .transactor
            .unregister_node(&self.transact_opts, node)
            .await
    }

    pub async fn request_entitlement_check(
        &self,
        wallet: Address,
        transaction_id: B256,
        role_id: U256,
        nodes: Vec<Address>,
    ) -> Result<PendingTx, CheckerError> {
        self.checker
            .transactor
            .request_entitlement_check(&self.transact_opts, wallet, transaction_id, role_id, nodes)
            .await
    }

    pub async fn request_entitlement_check_v2(
        &self,
        wallet: Address,
        transaction_id: B256,
        request_id: U256,
        extra_data: Bytes,
    ) -> Result<PendingTx, CheckerError> {
        self.checker
            .transactor
            .request_entitlement_check_v2(&self.transact_opts, wallet, transaction_id, request_id, extra_data)
            .await
    }

    pub async fn transact_raw(&self, calldata: Bytes) -> Result<PendingTx, CheckerError> {
        self.checker
            .transactor
            .transact_raw(&self.transact_opts, calldata)
            .await
    }

    pub async fn transfer(&self) -> Result<PendingTx, CheckerError> {
        self.checker.transactor.transfer(&self.transact_opts).await
    }
}

// Reads go through the session's call options, so a pinned block gives a
// consistent listing
#[async_trait]
impl NodeDirectory for CheckerSession {
    async fn node_count(&self) -> Result<U256, CheckerError> {
        self.get_node_count().await
    }

    async fn node_at_index(&self, index: U256) -> Result<Address, CheckerError> {
        self.get_node_at_index(index).await
    }
}
