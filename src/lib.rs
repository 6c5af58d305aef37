//! Typed Rust client for the EntitlementChecker contract
//!
//! - `bindings`: `sol!`-generated types plus the embedded ABI and bytecode
//! - `domain`: call options, decoded event records, errors, ABI registry
//! - `infrastructure`: providers and the caller/transactor/filterer roles
//! - `modules`: offline ABI tools and event export used by the CLI

pub mod bindings;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;

pub use domain::checker::{
    requests_for, CallOpts, CheckerError, ContractRevert, EntitlementCheckRequest, EventRecord,
    FilterOpts, RequestVersion, TransactOpts, WatchOpts,
};
pub use infrastructure::checker::{
    confirm, deploy, ensure_node_registered, list_nodes, CheckerSession, EntitlementChecker,
    EntitlementCheckerCaller, EntitlementCheckerFilterer, EntitlementCheckerTransactor,
    EventWatch, NodeDirectory, Registration,
};
pub use infrastructure::ethereum::{connect, signer_from_env, Connection, ProviderConfig};
