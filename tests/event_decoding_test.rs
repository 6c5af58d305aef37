//! Log decoding through the filterer, without a node
//!
//! Logs are built by hand in the exact layout a node returns them.

use alloy::primitives::{address, b256, fixed_bytes, Address, LogData, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use entitlement_checker::bindings::{
    EntitlementCheckRequestedV2, EntitlementCheckerEvents, InterfaceRemoved, NodeRegistered,
    NodeUnregistered,
};
use entitlement_checker::{requests_for, EntitlementCheckRequest, EntitlementChecker, EventRecord, RequestVersion};

const CHECKER: Address = address!("0x00000000000000000000000000000000000000cc");

fn offline_checker() -> EntitlementChecker {
    // Nothing is sent; the provider only has to exist
    let url = "http://127.0.0.1:8545".parse().unwrap();
    let provider = ProviderBuilder::new().connect_http(url).erased();
    EntitlementChecker::new(CHECKER, provider, false)
}

fn word(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes()
}

fn address_word(address: Address) -> [u8; 32] {
    address.into_word().0
}

fn log(topics: Vec<B256>, data: Vec<u8>, block: u64, index: u64) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address: CHECKER,
            data: LogData::new_unchecked(topics, data.into()),
        },
        block_number: Some(block),
        log_index: Some(index),
        transaction_hash: Some(B256::repeat_byte(0x77)),
        ..Default::default()
    }
}

fn v2_request_log(selected: &[Address], block: u64) -> Log {
    let mut data = Vec::new();
    data.extend(address_word(address!("0x00000000000000000000000000000000000000a1")));
    data.extend(address_word(address!("0x00000000000000000000000000000000000000a2")));
    data.extend(address_word(address!("0x00000000000000000000000000000000000000a3")));
    data.extend(B256::repeat_byte(0x42).0);
    data.extend(word(5));
    data.extend(word(6 * 32)); // offset of selectedNodes
    data.extend(word(selected.len() as u64));
    for node in selected {
        data.extend(address_word(*node));
    }
    log(vec![EntitlementCheckRequestedV2::SIGNATURE_HASH], data, block, 0)
}

#[tokio::test]
async fn test_parse_node_registered() {
    let checker = offline_checker();
    let node = address!("0x000000000000000000000000000000000000beef");
    let raw = log(vec![NodeRegistered::SIGNATURE_HASH, node.into_word()], vec![], 10, 2);

    let record = checker.filterer.parse_node_registered(&raw).unwrap();
    assert_eq!(record.event.nodeAddress, node);
    assert_eq!(record.address, CHECKER);
    assert_eq!(record.block_number, Some(10));
    assert_eq!(record.log_index, Some(2));
    assert_eq!(record.transaction_hash, Some(B256::repeat_byte(0x77)));
    assert!(!record.removed);
}

#[tokio::test]
async fn test_parse_rejects_other_event() {
    let checker = offline_checker();
    let raw = log(
        vec![NodeUnregistered::SIGNATURE_HASH, Address::repeat_byte(1).into_word()],
        vec![],
        1,
        0,
    );
    assert!(checker.filterer.parse_node_registered(&raw).is_err());
    assert!(checker.filterer.parse_node_unregistered(&raw).is_ok());
}

#[tokio::test]
async fn test_parse_interface_removed_topic() {
    let checker = offline_checker();
    let raw = log(
        vec![
            InterfaceRemoved::SIGNATURE_HASH,
            b256!("0x01ffc9a700000000000000000000000000000000000000000000000000000000"),
        ],
        vec![],
        3,
        1,
    );
    let record = checker.filterer.parse_interface_removed(&raw).unwrap();
    assert_eq!(record.event.interfaceId, fixed_bytes!("0x01ffc9a7"));
}

#[tokio::test]
async fn test_parse_initialized() {
    let checker = offline_checker();
    let raw = log(
        vec![b256!("0xe9c9b456cb2994b80aeef036cf59d26e9617df80f816a6ee5a5b4166e07e2f5c")],
        word(1).to_vec(),
        1,
        0,
    );
    assert_eq!(checker.filterer.parse_initialized(&raw).unwrap().event.version, 1);
}

#[tokio::test]
async fn test_parse_request_v2() {
    let checker = offline_checker();
    let nodes = [Address::repeat_byte(0xb1), Address::repeat_byte(0xb2)];
    let record = checker
        .filterer
        .parse_entitlement_check_requested_v2(&v2_request_log(&nodes, 20))
        .unwrap();

    let event = &record.event;
    assert_eq!(event.walletAddress, address!("0x00000000000000000000000000000000000000a1"));
    assert_eq!(event.spaceAddress, address!("0x00000000000000000000000000000000000000a2"));
    assert_eq!(event.resolverAddress, address!("0x00000000000000000000000000000000000000a3"));
    assert_eq!(event.transactionId, B256::repeat_byte(0x42));
    assert_eq!(event.roleId, U256::from(5));
    assert_eq!(event.selectedNodes, nodes.to_vec());
}

#[tokio::test]
async fn test_truncated_payload_is_decode_error() {
    let checker = offline_checker();
    let mut raw = v2_request_log(&[Address::repeat_byte(1)], 1);
    let truncated = raw.inner.data.data[..64].to_vec();
    raw.inner.data = LogData::new_unchecked(raw.inner.data.topics().to_vec(), truncated.into());

    let err = checker
        .filterer
        .parse_entitlement_check_requested_v2(&raw)
        .unwrap_err();
    assert!(err.to_string().contains("EntitlementCheckRequestedV2"));
}

#[test]
fn test_requests_for_selected_node() {
    let target = Address::repeat_byte(0xb2);
    let logs = [
        v2_request_log(&[Address::repeat_byte(0xb1), target], 1),
        v2_request_log(&[Address::repeat_byte(0xb1)], 2),
        v2_request_log(&[target], 3),
    ];

    let requests = logs.iter().filter_map(|raw| {
        let record = EventRecord::decode_any(raw).unwrap()?;
        let request = EntitlementCheckRequest::from_event(&record.event)?;
        Some(record.map(|_| request))
    });
    let selected = requests_for(target, requests);

    let blocks: Vec<_> = selected.iter().map(|record| record.block_number).collect();
    assert_eq!(blocks, vec![Some(1), Some(3)]);
    assert!(selected
        .iter()
        .all(|record| record.event.version == RequestVersion::V2 && record.event.resolver.is_some()));
}

#[test]
fn test_decode_any_covers_every_event() {
    let raw = log(
        vec![NodeUnregistered::SIGNATURE_HASH, Address::repeat_byte(9).into_word()],
        vec![],
        4,
        0,
    );
    let record = EventRecord::decode_any(&raw).unwrap().unwrap();
    assert!(matches!(
        record.event,
        EntitlementCheckerEvents::NodeUnregistered(ref ev) if ev.nodeAddress == Address::repeat_byte(9)
    ));
}
