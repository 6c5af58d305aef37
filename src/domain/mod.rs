//! Domain layer - types independent of transport
//!
//! - `abi`: selector/topic registry and the dynamic decoder contract
//! - `checker`: options, decoded events, and errors for the checker binding

pub mod abi;
pub mod checker;
