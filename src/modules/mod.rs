//! Command modules
//!
//! - toolkit: offline ABI tools (selectors, encode, decode)
//! - export: event output as table, CSV, or JSON

pub mod export;
pub mod toolkit;
