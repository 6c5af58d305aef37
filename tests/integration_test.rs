//! Live round trip against a dev node (anvil)
//!
//! Ignored by default. Run with:
//!   anvil &
//!   RPC_URL=http://127.0.0.1:8545 cargo test -- --ignored

use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use entitlement_checker::{
    connect, deploy, ensure_node_registered, list_nodes, CallOpts, ContractRevert, FilterOpts,
    ProviderConfig, Registration, TransactOpts, WatchOpts,
};

// anvil account 0
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn rpc_url() -> String {
    std::env::var("RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string())
}

#[tokio::test]
#[ignore = "needs a dev node at RPC_URL"]
async fn test_register_query_and_events() {
    let signer: PrivateKeySigner = DEV_KEY.parse().expect("valid key");
    let connection = connect(ProviderConfig::from_endpoint(&rpc_url()), Some(signer))
        .await
        .expect("should connect");
    let opts = TransactOpts {
        from: connection.signer,
        ..TransactOpts::default()
    };

    let start = connection.provider.get_block_number().await.expect("block number");
    let checker = deploy(&connection, &opts).await.expect("should deploy");
    println!("✓ Deployed at {}", checker.address());

    // The constructor disables initializers, so direct init is rejected
    let err = checker
        .transactor
        .entitlement_checker_init(&opts)
        .await
        .expect_err("initializers are disabled");
    assert!(err.is_revert(ContractRevert::NotInInitializingState), "{err:?}");
    println!("✓ init rejected: {err}");

    let call_opts = CallOpts::default();
    assert_eq!(
        checker.caller.get_node_count(&call_opts).await.unwrap(),
        U256::ZERO
    );

    // Registration depends on operator setup, so only the error path is checked
    let node = Address::repeat_byte(0x11);
    match ensure_node_registered(&checker, node, &opts).await {
        Ok(Registration::Registered(receipt)) => println!("✓ registered in {}", receipt.transaction_hash),
        Ok(Registration::AlreadyRegistered) => println!("✓ already registered"),
        Err(err) => {
            println!("✓ registerNode rejected: {err}");
            assert!(!checker.caller.is_valid_node(&call_opts, node).await.unwrap());
        }
    }

    let session = checker.session(call_opts, opts);
    let nodes = list_nodes(&session).await.unwrap();
    assert_eq!(U256::from(nodes.len()), session.get_node_count().await.unwrap());

    let too_many = U256::from(nodes.len() + 1);
    let err = session
        .get_random_nodes(too_many)
        .await
        .expect_err("cannot pick more nodes than registered");
    println!("✓ getRandomNodes rejected: {err}");

    let events = checker
        .filterer
        .filter_initialized(&FilterOpts {
            start,
            end: None,
        })
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.version, u32::MAX);
    assert_eq!(events[0].address, checker.address());

    let all = checker
        .filterer
        .filter_all(&FilterOpts {
            start: 0,
            end: None,
        })
        .await
        .unwrap();
    assert!(!all.is_empty());
    println!("✓ {} events since genesis", all.len());
}

#[tokio::test]
#[ignore = "needs a dev node at RPC_URL"]
async fn test_watch_backfills_constructor_event() {
    let signer: PrivateKeySigner = DEV_KEY.parse().expect("valid key");
    let connection = connect(ProviderConfig::from_endpoint(&rpc_url()), Some(signer))
        .await
        .expect("should connect");
    let opts = TransactOpts {
        from: connection.signer,
        ..TransactOpts::default()
    };
    let start = connection.provider.get_block_number().await.expect("block number");
    let checker = deploy(&connection, &opts).await.expect("should deploy");
    let filterer = checker
        .filterer
        .clone()
        .with_poll_interval(Duration::from_millis(200));

    let mut watch = filterer
        .watch_initialized(&WatchOpts { start: Some(start) })
        .await
        .expect("should watch");

    let record = tokio::time::timeout(Duration::from_secs(10), watch.next())
        .await
        .expect("event within timeout")
        .expect("watch open")
        .expect("event decodes");
    assert_eq!(record.event.version, u32::MAX);
    assert_eq!(record.address, checker.address());

    // Nothing else initializes this contract
    let extra = tokio::time::timeout(Duration::from_secs(1), watch.next()).await;
    assert!(extra.is_err(), "unexpected second event: {extra:?}");
    watch.unsubscribe();
    println!("✓ constructor Initialized event backfilled");
}
