//! Decoded events together with the log they came from

use alloy::primitives::{Address, TxHash, B256};
use alloy::rpc::types::Log;
use alloy::sol_types::{SolEvent, SolEventInterface};

use super::CheckerError;
use crate::bindings::{
    EntitlementCheckRequested, EntitlementCheckRequestedV2, EntitlementCheckerEvents,
    Initialized, InterfaceAdded, InterfaceRemoved, NodeRegistered, NodeUnregistered,
};

/// A typed event plus the log metadata it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord<E> {
    pub event: E,
    /// Emitting contract
    pub address: Address,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<TxHash>,
    pub log_index: Option<u64>,
    /// Set when the log was dropped by a reorg
    pub removed: bool,
}

impl<E> EventRecord<E> {
    pub fn new(event: E, log: &Log) -> Self {
        Self {
            event,
            address: log.address(),
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
            removed: log.removed,
        }
    }

    pub fn map<F>(self, f: impl FnOnce(E) -> F) -> EventRecord<F> {
        EventRecord {
            event: f(self.event),
            address: self.address,
            block_number: self.block_number,
            transaction_hash: self.transaction_hash,
            log_index: self.log_index,
            removed: self.removed,
        }
    }
}

impl<E: SolEvent> EventRecord<E> {
    /// Decode a log as event `E`; fails on a topic0 mismatch or bad payload
    pub fn decode(log: &Log) -> Result<Self, CheckerError> {
        let decoded = E::decode_log(&log.inner).map_err(|source| CheckerError::Decode {
            event: E::SIGNATURE,
            source,
        })?;
        Ok(Self::new(decoded.data, log))
    }
}

impl EventRecord<EntitlementCheckerEvents> {
    /// Decode any checker event.
    ///
    /// Returns `Ok(None)` when topic0 is not one of the checker's events, so
    /// logs from other contracts sharing a filter can be skipped.
    pub fn decode_any(log: &Log) -> Result<Option<Self>, CheckerError> {
        match log.topic0() {
            Some(topic) if is_checker_event(topic) => {}
            _ => return Ok(None),
        }
        let decoded = EntitlementCheckerEvents::decode_log(&log.inner).map_err(|source| {
            CheckerError::Decode {
                event: "EntitlementChecker",
                source,
            }
        })?;
        Ok(Some(Self::new(decoded.data, log)))
    }
}

/// Whether `topic` is the topic0 of one of the checker's events
pub fn is_checker_event(topic: &B256) -> bool {
    [
        EntitlementCheckRequested::SIGNATURE_HASH,
        EntitlementCheckRequestedV2::SIGNATURE_HASH,
        Initialized::SIGNATURE_HASH,
        InterfaceAdded::SIGNATURE_HASH,
        InterfaceRemoved::SIGNATURE_HASH,
        NodeRegistered::SIGNATURE_HASH,
        NodeUnregistered::SIGNATURE_HASH,
    ]
    .contains(topic)
}

/// Short event name for display
pub fn event_name(event: &EntitlementCheckerEvents) -> &'static str {
    match event {
        EntitlementCheckerEvents::EntitlementCheckRequested(_) => "EntitlementCheckRequested",
        EntitlementCheckerEvents::EntitlementCheckRequestedV2(_) => "EntitlementCheckRequestedV2",
        EntitlementCheckerEvents::Initialized(_) => "Initialized",
        EntitlementCheckerEvents::InterfaceAdded(_) => "InterfaceAdded",
        EntitlementCheckerEvents::InterfaceRemoved(_) => "InterfaceRemoved",
        EntitlementCheckerEvents::NodeRegistered(_) => "NodeRegistered",
        EntitlementCheckerEvents::NodeUnregistered(_) => "NodeUnregistered",
    }
}
