//! ABI decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use anyhow::{bail, Context, Result};

use crate::domain::abi::{
    AbiDecoder, AbiRegistry, DecodedArg, DecodedCall, DecodedError, DecodedEvent,
    FunctionSignature, ParamSpec,
};

/// ABI decoder implementation using alloy-dyn-abi
pub struct AlloyAbiDecoder {
    registry: AbiRegistry,
}

impl AlloyAbiDecoder {
    pub fn new(registry: AbiRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AbiRegistry {
        &self.registry
    }
}

impl AbiDecoder for AlloyAbiDecoder {
    fn decode_calldata(&self, function: &FunctionSignature, data: &[u8]) -> Result<DecodedCall> {
        let Some((selector, args_data)) = split_selector(data) else {
            bail!("calldata too short (need at least 4 bytes for selector)");
        };

        if selector != function.selector {
            bail!(
                "selector mismatch: got 0x{}, expected 0x{}",
                hex::encode(selector),
                hex::encode(function.selector)
            );
        }

        let arguments = decode_params(&function.inputs, args_data)
            .with_context(|| format!("Failed to decode calldata for {}", function.signature))?;

        Ok(DecodedCall {
            function_name: function.name.clone(),
            signature: function.signature.clone(),
            arguments,
        })
    }

    fn decode_by_selector(&self, selector: [u8; 4], data: &[u8]) -> Result<Option<DecodedCall>> {
        match self.registry.lookup(selector) {
            Some(function) => {
                let decoded = self.decode_calldata(function, data)?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    fn decode_revert(&self, data: &[u8]) -> Result<Option<DecodedError>> {
        let Some((selector, args_data)) = split_selector(data) else {
            return Ok(None);
        };
        let Some(error) = self.registry.lookup_error(selector) else {
            return Ok(None);
        };

        let arguments = decode_params(&error.inputs, args_data)
            .with_context(|| format!("Failed to decode revert data for {}", error.signature))?;

        Ok(Some(DecodedError {
            error_name: error.name.clone(),
            signature: error.signature.clone(),
            arguments,
        }))
    }

    fn decode_log(&self, topics: &[[u8; 32]], data: &[u8]) -> Result<Option<DecodedEvent>> {
        let Some(topic0) = topics.first() else {
            return Ok(None);
        };
        let Some(event) = self.registry.lookup_event(*topic0) else {
            return Ok(None);
        };

        let indexed_count = event.inputs.iter().filter(|p| p.indexed).count();
        if topics.len() != indexed_count + 1 {
            bail!(
                "{} expects {} topics, got {}",
                event.signature,
                indexed_count + 1,
                topics.len()
            );
        }

        let body: Vec<ParamSpec> = event
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .cloned()
            .collect();
        let mut body_values = decode_params(&body, data)
            .with_context(|| format!("Failed to decode log data for {}", event.signature))?
            .into_iter();

        let mut indexed_topics = topics[1..].iter();
        let mut arguments = Vec::with_capacity(event.inputs.len());
        for (idx, param) in event.inputs.iter().enumerate() {
            let arg = if param.indexed {
                // Length was checked above
                let topic = indexed_topics.next().context("missing topic")?;
                DecodedArg {
                    name: param_name(param, idx),
                    kind: param.kind.clone(),
                    value: decode_topic(&param.kind, topic)?,
                }
            } else {
                let mut arg = body_values.next().context("missing log data value")?;
                arg.name = param_name(param, idx);
                arg
            };
            arguments.push(arg);
        }

        Ok(Some(DecodedEvent {
            event_name: event.name.clone(),
            signature: event.signature.clone(),
            arguments,
        }))
    }
}

fn split_selector(data: &[u8]) -> Option<([u8; 4], &[u8])> {
    if data.len() < 4 {
        return None;
    }
    let (selector, rest) = data.split_at(4);
    Some((selector.try_into().ok()?, rest))
}

fn param_name(param: &ParamSpec, idx: usize) -> String {
    if param.name.trim().is_empty() {
        format!("arg{}", idx)
    } else {
        param.name.clone()
    }
}

/// Decode a head/tail encoded parameter list
fn decode_params(params: &[ParamSpec], data: &[u8]) -> Result<Vec<DecodedArg>> {
    let types: Vec<DynSolType> = params
        .iter()
        .map(|param| {
            param.kind.parse::<DynSolType>().with_context(|| {
                format!("Failed to parse type '{}' for param '{}'", param.kind, param.name)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let values = if types.is_empty() {
        Vec::new()
    } else {
        match DynSolType::Tuple(types).abi_decode_params(data)? {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        }
    };

    Ok(params
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(idx, (param, value))| DecodedArg {
            name: param_name(param, idx),
            kind: param.kind.clone(),
            value: format_dyn_sol_value(value),
        })
        .collect())
}

/// Indexed values of dynamic type are stored as their keccak256 hash
fn decode_topic(kind: &str, topic: &[u8; 32]) -> Result<String> {
    let ty = kind
        .parse::<DynSolType>()
        .with_context(|| format!("Failed to parse type '{}'", kind))?;
    if ty.is_dynamic() || matches!(ty, DynSolType::FixedArray(..) | DynSolType::Tuple(_)) {
        return Ok(format!("0x{} (hash)", hex::encode(topic)));
    }
    let value = ty.abi_decode(topic).context("Failed to decode indexed topic")?;
    Ok(format_dyn_sol_value(&value))
}

/// Format a DynSolValue for display
pub(crate) fn format_dyn_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => {
            let s = u.to_string();
            // For very large numbers, show hex instead
            if s.len() > 20 {
                format!("0x{:x}", u)
            } else {
                s
            }
        }
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_string(),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => {
            if bytes.len() <= 32 {
                format!("0x{}", hex::encode(bytes))
            } else {
                format!("0x{}… ({} bytes)", hex::encode(&bytes[..32]), bytes.len())
            }
        }
        DynSolValue::String(s) => {
            if s.len() <= 64 {
                format!("\"{}\"", s)
            } else {
                format!("\"{}…\" ({} chars)", &s[..64], s.len())
            }
        }
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let max_items = 10;
            let items: Vec<String> = arr
                .iter()
                .take(max_items)
                .map(format_dyn_sol_value)
                .collect();
            if arr.len() > max_items {
                format!("[{}, …] ({} items)", items.join(", "), arr.len())
            } else {
                format!("[{}]", items.join(", "))
            }
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_dyn_sol_value).collect();
            format!("({})", items.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::abi::AbiLoader;

    fn decoder() -> AlloyAbiDecoder {
        AlloyAbiDecoder::new(AbiLoader::checker())
    }

    fn word(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_decode_register_node() {
        let calldata = hex::decode(
            "672d7a0d000000000000000000000000000000000000000000000000000000000000beef",
        )
        .unwrap();

        let result = decoder()
            .decode_by_selector([0x67, 0x2d, 0x7a, 0x0d], &calldata)
            .unwrap()
            .unwrap();

        assert_eq!(result.function_name, "registerNode");
        assert_eq!(result.arguments.len(), 1);
        assert_eq!(result.arguments[0].name, "node");
        assert!(result.arguments[0].value.to_lowercase().ends_with("beef"));
    }

    #[test]
    fn test_decode_dynamic_array_argument() {
        // getRandomNodes returns address[]; here we decode requestEntitlementCheck input
        let calldata = hex::decode(concat!(
            "541da4e5",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "0000000000000000000000000000000000000000000000000000000000000080",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "00000000000000000000000000000000000000000000000000000000000000aa",
            "00000000000000000000000000000000000000000000000000000000000000bb",
        ))
        .unwrap();

        let result = decoder()
            .decode_by_selector([0x54, 0x1d, 0xa4, 0xe5], &calldata)
            .unwrap()
            .unwrap();

        assert_eq!(result.arguments.len(), 4);
        assert_eq!(result.arguments[1].kind, "bytes32");
        assert_eq!(result.arguments[2].value, "3");
        assert_eq!(result.arguments[3].kind, "address[]");
        assert!(result.arguments[3].value.to_lowercase().contains("00aa"));
    }

    #[test]
    fn test_selector_mismatch() {
        let function = AbiLoader::checker().lookup_name("registerNode").cloned().unwrap();
        let calldata = hex::decode("deadbeef").unwrap();

        let result = decoder().decode_calldata(&function, &calldata);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("selector mismatch"));
    }

    #[test]
    fn test_unknown_selector() {
        let result = decoder().decode_by_selector([0xde, 0xad, 0xbe, 0xef], &[0xde, 0xad, 0xbe, 0xef]);
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_decode_revert() {
        let decoded = decoder()
            .decode_revert(&hex::decode("17e3e0b9").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(decoded.error_name, "EntitlementChecker_NodeNotRegistered");
        assert!(decoded.arguments.is_empty());

        assert!(decoder().decode_revert(&[0x08, 0xc3]).unwrap().is_none());
    }

    #[test]
    fn test_decode_indexed_log() {
        let topics = [
            word("8bd383568d0bc57b64b8e424138fc19ae827e694e05757faa8fea8f63fb87315"),
            word("01ffc9a700000000000000000000000000000000000000000000000000000000"),
        ];
        let event = decoder().decode_log(&topics, &[]).unwrap().unwrap();
        assert_eq!(event.event_name, "InterfaceRemoved");
        assert_eq!(event.arguments[0].name, "interfaceId");
        assert_eq!(event.arguments[0].value, "0x01ffc9a7");
    }

    #[test]
    fn test_decode_log_topic_count_mismatch() {
        let topics = [word(
            "564728e6a7c8edd446557d94e0339d5e6ca2e05f42188914efdbdc87bcbbabf6",
        )];
        assert!(decoder().decode_log(&topics, &[]).is_err());
        assert!(decoder().decode_log(&[], &[]).unwrap().is_none());
    }
}
