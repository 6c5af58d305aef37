//! Builds selector/topic registries from JSON ABIs

use alloy_json_abi::{EventParam, JsonAbi, Param};

use crate::bindings::metadata;
use crate::domain::abi::{AbiRegistry, ErrorSignature, EventSignature, FunctionSignature, ParamSpec};

/// Turns a `JsonAbi` into an `AbiRegistry`
pub struct AbiLoader;

impl AbiLoader {
    /// Registry for the checker contract, from the compiled-in metadata
    pub fn checker() -> AbiRegistry {
        Self::from_abi(&metadata().abi)
    }

    pub fn from_abi(abi: &JsonAbi) -> AbiRegistry {
        let mut registry = AbiRegistry::new();

        for function in abi.functions() {
            registry.insert(FunctionSignature {
                selector: function.selector().0,
                name: function.name.clone(),
                signature: function.signature(),
                inputs: function.inputs.iter().map(param_spec).collect(),
                outputs: function.outputs.iter().map(param_spec).collect(),
                mutability: function.state_mutability.as_json_str().to_string(),
            });
        }

        for event in abi.events() {
            registry.insert_event(EventSignature {
                topic: event.selector().0,
                name: event.name.clone(),
                signature: event.signature(),
                inputs: event.inputs.iter().map(event_param_spec).collect(),
                anonymous: event.anonymous,
            });
        }

        for error in abi.errors() {
            registry.insert_error(ErrorSignature {
                selector: error.selector().0,
                name: error.name.clone(),
                signature: error.signature(),
                inputs: error.inputs.iter().map(param_spec).collect(),
            });
        }

        registry
    }
}

fn param_spec(param: &Param) -> ParamSpec {
    ParamSpec {
        name: param.name.clone(),
        kind: param.selector_type().into_owned(),
        indexed: false,
    }
}

fn event_param_spec(param: &EventParam) -> ParamSpec {
    ParamSpec {
        name: param.name.clone(),
        kind: param.selector_type().into_owned(),
        indexed: param.indexed,
    }
}
