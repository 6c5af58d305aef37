//! Decode checker calldata, revert data or raw logs back to readable form

use anyhow::{anyhow, bail, Context, Result};

use super::{strip_hex, ToolResult};
use crate::domain::abi::{AbiDecoder, DecodedArg};

/// Decode `input` as calldata for a checker method, falling back to revert data
pub fn decode(decoder: &dyn AbiDecoder, input: &str) -> Result<ToolResult> {
    let data = hex::decode(strip_hex(input)).context("Input is not valid hex")?;
    if data.len() < 4 {
        bail!("Data too short: must be at least 4 bytes (8 hex chars)");
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);

    if let Some(call) = decoder.decode_by_selector(selector, &data)? {
        return Ok(with_arguments(
            ToolResult::new("ABI Decode")
                .add("kind", "call")
                .add("signature", call.signature),
            &call.arguments,
        ));
    }

    if let Some(error) = decoder.decode_revert(&data)? {
        return Ok(with_arguments(
            ToolResult::new("ABI Decode")
                .add("kind", "revert")
                .add("signature", error.signature),
            &error.arguments,
        ));
    }

    bail!("Unknown selector 0x{}", hex::encode(selector))
}

/// Decode a raw log from its topics (topic0 first) and data
pub fn decode_log(decoder: &dyn AbiDecoder, topics: &[String], data: &str) -> Result<ToolResult> {
    let topics = topics
        .iter()
        .map(|topic| {
            let bytes = hex::decode(strip_hex(topic))
                .with_context(|| format!("Topic {topic} is not valid hex"))?;
            <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| anyhow!("Topic {topic} is not 32 bytes"))
        })
        .collect::<Result<Vec<_>>>()?;
    let data = hex::decode(strip_hex(data)).context("Log data is not valid hex")?;

    let Some(topic0) = topics.first() else {
        bail!("A log needs at least one topic");
    };
    match decoder.decode_log(&topics, &data)? {
        Some(event) => Ok(with_arguments(
            ToolResult::new("ABI Decode")
                .add("kind", "event")
                .add("signature", event.signature),
            &event.arguments,
        )),
        None => bail!("Unknown event topic 0x{}", hex::encode(topic0)),
    }
}

fn with_arguments(mut result: ToolResult, arguments: &[DecodedArg]) -> ToolResult {
    for (i, arg) in arguments.iter().enumerate() {
        let label = if arg.name.is_empty() {
            format!("arg{i}")
        } else {
            arg.name.clone()
        };
        result = result.add(label, format!("{} ({})", arg.value, arg.kind));
    }
    result
}
