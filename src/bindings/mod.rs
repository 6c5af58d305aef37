//! Typed bindings for the `EntitlementChecker` contract
//!
//! The binding is generated by `sol!` from the JSON artifact in `abi/`, which
//! carries both the ABI and the deployment bytecode. Everything the rest of the
//! crate needs (call structs, event structs, the error enum, the instance type)
//! is re-exported from here.

mod metadata;

pub use metadata::{metadata, ContractMetadata};

alloy::sol!(
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    EntitlementChecker,
    "abi/EntitlementChecker.json"
);

pub use EntitlementChecker::{
    EntitlementCheckRequested, EntitlementCheckRequestedV2, EntitlementCheckerCalls,
    EntitlementCheckerErrors, EntitlementCheckerEvents, Initialized, InterfaceAdded,
    InterfaceRemoved, NodeRegistered, NodeUnregistered,
};

/// Bound contract instance over a type-erased provider
pub type EntitlementCheckerInstance =
    EntitlementChecker::EntitlementCheckerInstance<alloy::providers::DynProvider>;
