//! Checker errors and named contract reverts

use alloy::primitives::TxHash;
use alloy::providers::PendingTransactionError;
use alloy::sol_types::{SolError, SolInterface};
use alloy::transports::TransportError;
use thiserror::Error;

use crate::bindings::{EntitlementChecker, EntitlementCheckerErrors};

/// A named revert raised by the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractRevert {
    InsufficientFunds,
    InsufficientNumberOfNodes,
    InvalidNodeOperator,
    InvalidOperator,
    NoPendingRequests,
    NoRefundsAvailable,
    NodeAlreadyRegistered,
    NodeNotRegistered,
    OperatorNotActive,
    InInitializingState,
    NotInInitializingState,
    InterfaceAlreadySupported,
    InterfaceNotSupported,
}

impl ContractRevert {
    pub const ALL: [ContractRevert; 13] = [
        ContractRevert::InsufficientFunds,
        ContractRevert::InsufficientNumberOfNodes,
        ContractRevert::InvalidNodeOperator,
        ContractRevert::InvalidOperator,
        ContractRevert::NoPendingRequests,
        ContractRevert::NoRefundsAvailable,
        ContractRevert::NodeAlreadyRegistered,
        ContractRevert::NodeNotRegistered,
        ContractRevert::OperatorNotActive,
        ContractRevert::InInitializingState,
        ContractRevert::NotInInitializingState,
        ContractRevert::InterfaceAlreadySupported,
        ContractRevert::InterfaceNotSupported,
    ];

    /// Solidity signature of the error, e.g. `EntitlementChecker_NodeAlreadyRegistered()`
    pub fn signature(&self) -> &'static str {
        use EntitlementChecker as C;
        match self {
            Self::InsufficientFunds => C::EntitlementChecker_InsufficientFunds::SIGNATURE,
            Self::InsufficientNumberOfNodes => {
                C::EntitlementChecker_InsufficientNumberOfNodes::SIGNATURE
            }
            Self::InvalidNodeOperator => C::EntitlementChecker_InvalidNodeOperator::SIGNATURE,
            Self::InvalidOperator => C::EntitlementChecker_InvalidOperator::SIGNATURE,
            Self::NoPendingRequests => C::EntitlementChecker_NoPendingRequests::SIGNATURE,
            Self::NoRefundsAvailable => C::EntitlementChecker_NoRefundsAvailable::SIGNATURE,
            Self::NodeAlreadyRegistered => C::EntitlementChecker_NodeAlreadyRegistered::SIGNATURE,
            Self::NodeNotRegistered => C::EntitlementChecker_NodeNotRegistered::SIGNATURE,
            Self::OperatorNotActive => C::EntitlementChecker_OperatorNotActive::SIGNATURE,
            Self::InInitializingState => C::Initializable_InInitializingState::SIGNATURE,
            Self::NotInInitializingState => C::Initializable_NotInInitializingState::SIGNATURE,
            Self::InterfaceAlreadySupported => C::Introspection_AlreadySupported::SIGNATURE,
            Self::InterfaceNotSupported => C::Introspection_NotSupported::SIGNATURE,
        }
    }

    /// Error name without the parameter list
    pub fn name(&self) -> &'static str {
        let sig = self.signature();
        sig.split_once('(').map(|(name, _)| name).unwrap_or(sig)
    }

    /// 4-byte error selector
    pub fn selector(&self) -> [u8; 4] {
        use EntitlementChecker as C;
        match self {
            Self::InsufficientFunds => C::EntitlementChecker_InsufficientFunds::SELECTOR,
            Self::InsufficientNumberOfNodes => {
                C::EntitlementChecker_InsufficientNumberOfNodes::SELECTOR
            }
            Self::InvalidNodeOperator => C::EntitlementChecker_InvalidNodeOperator::SELECTOR,
            Self::InvalidOperator => C::EntitlementChecker_InvalidOperator::SELECTOR,
            Self::NoPendingRequests => C::EntitlementChecker_NoPendingRequests::SELECTOR,
            Self::NoRefundsAvailable => C::EntitlementChecker_NoRefundsAvailable::SELECTOR,
            Self::NodeAlreadyRegistered => C::EntitlementChecker_NodeAlreadyRegistered::SELECTOR,
            Self::NodeNotRegistered => C::EntitlementChecker_NodeNotRegistered::SELECTOR,
            Self::OperatorNotActive => C::EntitlementChecker_OperatorNotActive::SELECTOR,
            Self::InInitializingState => C::Initializable_InInitializingState::SELECTOR,
            Self::NotInInitializingState => C::Initializable_NotInInitializingState::SELECTOR,
            Self::InterfaceAlreadySupported => C::Introspection_AlreadySupported::SELECTOR,
            Self::InterfaceNotSupported => C::Introspection_NotSupported::SELECTOR,
        }
    }

    /// Decode revert data (selector plus empty payload).
    ///
    /// Returns `None` for selectors that are not part of this contract's ABI.
    pub fn decode(data: &[u8]) -> Option<Self> {
        EntitlementCheckerErrors::abi_decode(data).ok().map(Self::from)
    }
}

impl From<EntitlementCheckerErrors> for ContractRevert {
    fn from(err: EntitlementCheckerErrors) -> Self {
        use EntitlementCheckerErrors as E;
        match err {
            E::EntitlementChecker_InsufficientFunds(_) => Self::InsufficientFunds,
            E::EntitlementChecker_InsufficientNumberOfNodes(_) => Self::InsufficientNumberOfNodes,
            E::EntitlementChecker_InvalidNodeOperator(_) => Self::InvalidNodeOperator,
            E::EntitlementChecker_InvalidOperator(_) => Self::InvalidOperator,
            E::EntitlementChecker_NoPendingRequests(_) => Self::NoPendingRequests,
            E::EntitlementChecker_NoRefundsAvailable(_) => Self::NoRefundsAvailable,
            E::EntitlementChecker_NodeAlreadyRegistered(_) => Self::NodeAlreadyRegistered,
            E::EntitlementChecker_NodeNotRegistered(_) => Self::NodeNotRegistered,
            E::EntitlementChecker_OperatorNotActive(_) => Self::OperatorNotActive,
            E::Initializable_InInitializingState(_) => Self::InInitializingState,
            E::Initializable_NotInInitializingState(_) => Self::NotInInitializingState,
            E::Introspection_AlreadySupported(_) => Self::InterfaceAlreadySupported,
            E::Introspection_NotSupported(_) => Self::InterfaceNotSupported,
        }
    }
}

impl std::fmt::Display for ContractRevert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.signature())
    }
}

/// Errors returned by the checker binding
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("contract reverted with {0}")]
    Revert(ContractRevert),

    #[error(transparent)]
    Contract(alloy::contract::Error),

    #[error(transparent)]
    Transport(TransportError),

    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),

    #[error("failed to decode {event} log: {source}")]
    Decode {
        event: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },

    #[error("transaction {0} was mined but reverted")]
    TransactionFailed(TxHash),

    #[error("deployment receipt has no contract address")]
    MissingContractAddress,

    #[error("event watch ended: {0}")]
    WatchClosed(String),
}

impl CheckerError {
    /// The named revert, if the contract rejected the call with one
    pub fn revert(&self) -> Option<ContractRevert> {
        match self {
            Self::Revert(revert) => Some(*revert),
            _ => None,
        }
    }

    pub fn is_revert(&self, revert: ContractRevert) -> bool {
        self.revert() == Some(revert)
    }
}

impl From<alloy::contract::Error> for CheckerError {
    fn from(err: alloy::contract::Error) -> Self {
        match err.as_decoded_interface_error::<EntitlementCheckerErrors>() {
            Some(decoded) => Self::Revert(decoded.into()),
            None => Self::Contract(err),
        }
    }
}

impl From<TransportError> for CheckerError {
    fn from(err: TransportError) -> Self {
        let revert = err
            .as_error_resp()
            .and_then(|payload| payload.as_revert_data())
            .and_then(|data| ContractRevert::decode(&data));
        match revert {
            Some(revert) => Self::Revert(revert),
            None => Self::Transport(err),
        }
    }
}
