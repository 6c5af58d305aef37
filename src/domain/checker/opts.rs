//! Per-call options for reads, transactions, and log queries

use alloy::rpc::types::BlockId;
use alloy::primitives::{Address, U256};

/// Options for read-only contract calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOpts {
    /// Block to execute against; `None` means latest
    pub block: Option<BlockId>,
    /// Caller address for `msg.sender`
    pub from: Option<Address>,
}

impl CallOpts {
    pub fn at_block(number: u64) -> Self {
        Self {
            block: Some(BlockId::number(number)),
            from: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            block: Some(BlockId::pending()),
            from: None,
        }
    }
}

/// Options for state-mutating transactions
///
/// Unset fields are filled by the provider (nonce, gas, fees, chain id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactOpts {
    pub from: Option<Address>,
    /// Wei to attach; only meaningful for payable methods
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl TransactOpts {
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Raise the gas limit to at least `floor`, keeping an explicit higher limit
    pub fn with_gas_floor(mut self, floor: u64) -> Self {
        self.gas_limit = Some(self.gas_limit.map_or(floor, |limit| limit.max(floor)));
        self
    }
}

/// Block range for historical log queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOpts {
    pub start: u64,
    /// Last block to include; `None` means latest
    pub end: Option<u64>,
}

impl FilterOpts {
    pub fn range(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Where a live watch starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOpts {
    /// First block to deliver; `None` means new blocks only
    pub start: Option<u64>,
}
