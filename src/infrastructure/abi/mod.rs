//! ABI infrastructure - registry loading and alloy-dyn-abi decoding

mod decoder;
mod loader;

pub use decoder::AlloyAbiDecoder;
pub use loader::AbiLoader;
