//! Version-independent view of entitlement check requests

use alloy::primitives::{Address, B256, U256};

use super::EventRecord;
use crate::bindings::{
    EntitlementCheckRequested, EntitlementCheckRequestedV2, EntitlementCheckerEvents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestVersion {
    V1,
    V2,
}

/// An entitlement check request, as emitted by either request event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementCheckRequest {
    pub version: RequestVersion,
    /// `callerAddress` (V1) or `walletAddress` (V2)
    pub caller: Address,
    /// `contractAddress` (V1) or `spaceAddress` (V2)
    pub contract: Address,
    /// Only present on V2 requests
    pub resolver: Option<Address>,
    pub transaction_id: B256,
    pub role_id: U256,
    pub selected_nodes: Vec<Address>,
}

impl EntitlementCheckRequest {
    /// Whether `node` was picked to answer this request
    pub fn is_selected(&self, node: Address) -> bool {
        self.selected_nodes.contains(&node)
    }

    /// Extract a request from any checker event; other events yield `None`
    pub fn from_event(event: &EntitlementCheckerEvents) -> Option<Self> {
        match event {
            EntitlementCheckerEvents::EntitlementCheckRequested(ev) => Some(ev.clone().into()),
            EntitlementCheckerEvents::EntitlementCheckRequestedV2(ev) => Some(ev.clone().into()),
            _ => None,
        }
    }
}

impl From<EntitlementCheckRequested> for EntitlementCheckRequest {
    fn from(ev: EntitlementCheckRequested) -> Self {
        Self {
            version: RequestVersion::V1,
            caller: ev.callerAddress,
            contract: ev.contractAddress,
            resolver: None,
            transaction_id: ev.transactionId,
            role_id: ev.roleId,
            selected_nodes: ev.selectedNodes,
        }
    }
}

impl From<EntitlementCheckRequestedV2> for EntitlementCheckRequest {
    fn from(ev: EntitlementCheckRequestedV2) -> Self {
        Self {
            version: RequestVersion::V2,
            caller: ev.walletAddress,
            contract: ev.spaceAddress,
            resolver: Some(ev.resolverAddress),
            transaction_id: ev.transactionId,
            role_id: ev.roleId,
            selected_nodes: ev.selectedNodes,
        }
    }
}

/// Keep the requests that selected `node`, in their original order
pub fn requests_for(
    node: Address,
    records: impl IntoIterator<Item = EventRecord<EntitlementCheckRequest>>,
) -> Vec<EventRecord<EntitlementCheckRequest>> {
    records
        .into_iter()
        .filter(|record| record.event.is_selected(node))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::rpc::types::Log;

    const NODE_A: Address = address!("0x00000000000000000000000000000000000000a1");
    const NODE_B: Address = address!("0x00000000000000000000000000000000000000b2");

    fn v1(tx: u8, nodes: Vec<Address>) -> EntitlementCheckRequested {
        EntitlementCheckRequested {
            callerAddress: address!("0x1111111111111111111111111111111111111111"),
            contractAddress: address!("0x2222222222222222222222222222222222222222"),
            transactionId: B256::with_last_byte(tx),
            roleId: U256::from(4),
            selectedNodes: nodes,
        }
    }

    #[test]
    fn test_v1_conversion() {
        let request: EntitlementCheckRequest = v1(1, vec![NODE_A]).into();
        assert_eq!(request.version, RequestVersion::V1);
        assert_eq!(request.resolver, None);
        assert_eq!(request.role_id, U256::from(4));
        assert!(request.is_selected(NODE_A));
        assert!(!request.is_selected(NODE_B));
    }

    #[test]
    fn test_v2_conversion() {
        let ev = EntitlementCheckRequestedV2 {
            walletAddress: address!("0x3333333333333333333333333333333333333333"),
            spaceAddress: address!("0x4444444444444444444444444444444444444444"),
            resolverAddress: address!("0x5555555555555555555555555555555555555555"),
            transactionId: B256::with_last_byte(9),
            roleId: U256::from(2),
            selectedNodes: vec![NODE_B],
        };
        let request =
            EntitlementCheckRequest::from_event(&EntitlementCheckerEvents::EntitlementCheckRequestedV2(ev))
                .unwrap();
        assert_eq!(request.version, RequestVersion::V2);
        assert_eq!(request.caller, address!("0x3333333333333333333333333333333333333333"));
        assert_eq!(request.contract, address!("0x4444444444444444444444444444444444444444"));
        assert_eq!(
            request.resolver,
            Some(address!("0x5555555555555555555555555555555555555555"))
        );
        assert!(request.is_selected(NODE_B));
    }

    #[test]
    fn test_requests_for_filters_by_node() {
        let log = Log::default();
        let records = vec![
            EventRecord::new(EntitlementCheckRequest::from(v1(1, vec![NODE_A, NODE_B])), &log),
            EventRecord::new(EntitlementCheckRequest::from(v1(2, vec![NODE_B])), &log),
            EventRecord::new(EntitlementCheckRequest::from(v1(3, vec![NODE_A])), &log),
        ];

        let mine = requests_for(NODE_A, records);
        let ids: Vec<u8> = mine.iter().map(|r| r.event.transaction_id[31]).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_non_request_event_is_ignored() {
        let event = EntitlementCheckerEvents::NodeRegistered(crate::bindings::NodeRegistered {
            nodeAddress: NODE_A,
        });
        assert!(EntitlementCheckRequest::from_event(&event).is_none());
    }
}
