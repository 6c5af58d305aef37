//! Calldata encoding for checker methods

use alloy_dyn_abi::{DynSolType, DynSolValue};
use anyhow::{bail, Context, Result};

use super::ToolResult;
use crate::domain::abi::{AbiRegistry, FunctionSignature};

/// Encode a call to the checker method `method` from string arguments.
///
/// Arrays are written as `[a,b,c]`, bytes and fixed bytes as hex.
pub fn encode(registry: &AbiRegistry, method: &str, args: &[String]) -> Result<ToolResult> {
    let function = registry
        .lookup_name(method)
        .with_context(|| format!("Unknown method '{method}'"))?;
    let calldata = encode_calldata(function, args)?;

    Ok(ToolResult::new("ABI Encode")
        .add("signature", function.signature.clone())
        .add("selector", function.selector_hex())
        .add("calldata", format!("0x{}", hex::encode(&calldata))))
}

/// Selector followed by the ABI-encoded arguments
pub fn encode_calldata(function: &FunctionSignature, args: &[String]) -> Result<Vec<u8>> {
    if args.len() != function.inputs.len() {
        bail!(
            "Argument count mismatch: {} expects {} arguments, got {}",
            function.signature,
            function.inputs.len(),
            args.len()
        );
    }

    let values = function
        .inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (param, arg))| {
            let ty = param
                .kind
                .parse::<DynSolType>()
                .with_context(|| format!("Failed to parse type '{}'", param.kind))?;
            ty.coerce_str(arg.trim())
                .with_context(|| format!("Failed to parse argument {} ({} {})", i + 1, param.kind, param.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut calldata = function.selector.to_vec();
    if !values.is_empty() {
        calldata.extend_from_slice(&DynSolValue::Tuple(values).abi_encode_params());
    }
    Ok(calldata)
}
