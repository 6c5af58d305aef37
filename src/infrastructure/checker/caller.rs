//! Read-only access to the checker contract

use alloy::contract::{CallBuilder, CallDecoder};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::bindings::{EntitlementChecker, EntitlementCheckerInstance};
use crate::domain::checker::{CallOpts, CheckerError};

/// Apply block and sender overrides to a view call
pub(crate) fn with_call_opts<P, D>(mut call: CallBuilder<P, D>, opts: &CallOpts) -> CallBuilder<P, D>
where
    P: Provider,
    D: CallDecoder,
{
    if let Some(block) = opts.block {
        call = call.block(block);
    }
    if let Some(from) = opts.from {
        call = call.from(from);
    }
    call
}

/// View methods of the checker
#[derive(Clone)]
pub struct EntitlementCheckerCaller {
    pub(super) instance: EntitlementCheckerInstance,
}

impl EntitlementCheckerCaller {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            instance: EntitlementChecker::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    pub async fn get_node_at_index(&self, opts: &CallOpts, index: U256) -> Result<Address, CheckerError> {
        let call = self.instance.getNodeAtIndex(index);
        Ok(with_call_opts(call, opts).call().await?)
    }

    pub async fn get_node_count(&self, opts: &CallOpts) -> Result<U256, CheckerError> {
        let call = self.instance.getNodeCount();
        Ok(with_call_opts(call, opts).call().await?)
    }

    pub async fn get_nodes_by_operator(
        &self,
        opts: &CallOpts,
        operator: Address,
    ) -> Result<Vec<Address>, CheckerError> {
        let call = self.instance.getNodesByOperator(operator);
        Ok(with_call_opts(call, opts).call().await?)
    }

    /// Pseudo-random selection of `count` nodes.
    ///
    /// Reverts with `InsufficientNumberOfNodes` when fewer are registered.
    pub async fn get_random_nodes(&self, opts: &CallOpts, count: U256) -> Result<Vec<Address>, CheckerError> {
        let call = self.instance.getRandomNodes(count);
        Ok(with_call_opts(call, opts).call().await?)
    }

    pub async fn is_valid_node(&self, opts: &CallOpts, node: Address) -> Result<bool, CheckerError> {
        let call = self.instance.isValidNode(node);
        Ok(with_call_opts(call, opts).call().await?)
    }

    /// Untyped `eth_call` against the contract
    pub async fn call_raw(&self, opts: &CallOpts, calldata: Bytes) -> Result<Bytes, CheckerError> {
        let mut tx = TransactionRequest::default()
            .with_to(self.address())
            .with_input(calldata);
        if let Some(from) = opts.from {
            tx = tx.with_from(from);
        }

        let call = self.instance.provider().call(tx);
        let output = match opts.block {
            Some(block) => call.block(block).await?,
            None => call.await?,
        };
        Ok(output)
    }
}

/// Enumerable view of the node registry
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    async fn node_count(&self) -> Result<U256, CheckerError>;

    async fn node_at_index(&self, index: U256) -> Result<Address, CheckerError>;
}

/// Enumerate every registered node, in contract index order
pub async fn list_nodes(directory: &dyn NodeDirectory) -> Result<Vec<Address>, CheckerError> {
    let count = directory.node_count().await?;
    let mut nodes = Vec::new();
    let mut index = U256::ZERO;
    while index < count {
        nodes.push(directory.node_at_index(index).await?);
        index += U256::from(1);
    }
    tracing::debug!(count = nodes.len(), "listed registered nodes");
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::checker::ContractRevert;

    struct FixedDirectory {
        nodes: Vec<Address>,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl NodeDirectory for FixedDirectory {
        async fn node_count(&self) -> Result<U256, CheckerError> {
            Ok(U256::from(self.nodes.len()))
        }

        async fn node_at_index(&self, index: U256) -> Result<Address, CheckerError> {
            let index: usize = index.to();
            if self.fail_at == Some(index) {
                return Err(CheckerError::Revert(ContractRevert::NodeNotRegistered));
            }
            Ok(self.nodes[index])
        }
    }

    #[tokio::test]
    async fn test_list_nodes_in_order() {
        let nodes: Vec<Address> = (1..=3u8).map(Address::repeat_byte).collect();
        let directory = FixedDirectory {
            nodes: nodes.clone(),
            fail_at: None,
        };
        assert_eq!(list_nodes(&directory).await.unwrap(), nodes);
    }

    #[tokio::test]
    async fn test_list_nodes_empty() {
        let directory = FixedDirectory {
            nodes: vec![],
            fail_at: None,
        };
        assert!(list_nodes(&directory).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_nodes_propagates_revert() {
        let directory = FixedDirectory {
            nodes: vec![Address::repeat_byte(1), Address::repeat_byte(2)],
            fail_at: Some(1),
        };
        let err = list_nodes(&directory).await.unwrap_err();
        assert!(err.is_revert(ContractRevert::NodeNotRegistered));
    }

    #[tokio::test]
    async fn test_list_nodes_no_duplicates() {
        let nodes: Vec<Address> = (1..=5u8).map(Address::repeat_byte).collect();
        let directory = FixedDirectory {
            nodes,
            fail_at: None,
        };
        let listed = list_nodes(&directory).await.unwrap();
        let mut seen = HashMap::new();
        for node in &listed {
            *seen.entry(*node).or_insert(0) += 1;
        }
        assert!(seen.values().all(|count| *count == 1));
    }
}
