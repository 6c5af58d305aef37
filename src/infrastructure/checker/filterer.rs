//! Historical queries and live watches for checker events

use std::time::Duration;

use alloy::primitives::{Address, FixedBytes, B256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log};
use alloy::sol_types::SolEvent;
use futures::stream::{self, BoxStream};
use futures::{future, StreamExt};

use super::watch::EventWatch;
use crate::bindings::{
    EntitlementCheckRequested, EntitlementCheckRequestedV2, EntitlementCheckerEvents,
    Initialized, InterfaceAdded, InterfaceRemoved, NodeRegistered, NodeUnregistered,
};
use crate::domain::checker::{CheckerError, EventRecord, FilterOpts, WatchOpts};

/// Poll interval for `eth_getFilterChanges` on transports without pubsub
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

pub(crate) fn address_topics(addresses: &[Address]) -> Vec<B256> {
    addresses.iter().map(|address| address.into_word()).collect()
}

pub(crate) fn interface_topics(ids: &[FixedBytes<4>]) -> Vec<B256> {
    ids.iter()
        .map(|id| B256::right_padding_from(id.as_slice()))
        .collect()
}

pub(crate) fn with_range(filter: Filter, opts: &FilterOpts) -> Filter {
    let filter = filter.from_block(opts.start);
    match opts.end {
        Some(end) => filter.to_block(end),
        None => filter.to_block(BlockNumberOrTag::Latest),
    }
}

/// Drop logs mined at or before `head`; pending logs pass through
pub(crate) fn after_block(logs: BoxStream<'static, Log>, head: u64) -> BoxStream<'static, Log> {
    logs.filter(move |log| future::ready(log.block_number.is_none_or(|number| number > head)))
        .boxed()
}

// Generates filter_/watch_/parse_ for an event without indexed arguments
macro_rules! plain_event {
    ($event:ty, $filter:ident, $watch:ident, $parse:ident) => {
        pub async fn $filter(&self, opts: &FilterOpts) -> Result<Vec<EventRecord<$event>>, CheckerError> {
            self.query(with_range(self.event_filter::<$event>(), opts)).await
        }

        pub async fn $watch(&self, opts: &WatchOpts) -> Result<EventWatch<$event>, CheckerError> {
            self.watch(self.event_filter::<$event>(), opts).await
        }

        pub fn $parse(&self, log: &Log) -> Result<EventRecord<$event>, CheckerError> {
            EventRecord::decode(log)
        }
    };
}

// Same, for events whose single argument is indexed in topic1
macro_rules! indexed_event {
    ($event:ty, $arg:ident: $arg_ty:ty => $to_topics:ident, $filter:ident, $watch:ident, $parse:ident) => {
        pub async fn $filter(
            &self,
            opts: &FilterOpts,
            $arg: &[$arg_ty],
        ) -> Result<Vec<EventRecord<$event>>, CheckerError> {
            let filter = self.event_filter::<$event>().topic1($to_topics($arg));
            self.query(with_range(filter, opts)).await
        }

        pub async fn $watch(
            &self,
            opts: &WatchOpts,
            $arg: &[$arg_ty],
        ) -> Result<EventWatch<$event>, CheckerError> {
            let filter = self.event_filter::<$event>().topic1($to_topics($arg));
            self.watch(filter, opts).await
        }

        pub fn $parse(&self, log: &Log) -> Result<EventRecord<$event>, CheckerError> {
            EventRecord::decode(log)
        }
    };
}

/// Event access for the checker
#[derive(Clone)]
pub struct EntitlementCheckerFilterer {
    address: Address,
    provider: DynProvider,
    subscriptions: bool,
    poll_interval: Duration,
}

impl EntitlementCheckerFilterer {
    /// `subscriptions` selects `eth_subscribe` over filter polling for watches
    pub fn new(address: Address, provider: DynProvider, subscriptions: bool) -> Self {
        Self {
            address,
            provider,
            subscriptions,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn event_filter<E: SolEvent>(&self) -> Filter {
        Filter::new()
            .address(self.address)
            .event_signature(E::SIGNATURE_HASH)
    }

    async fn query<E: SolEvent>(&self, filter: Filter) -> Result<Vec<EventRecord<E>>, CheckerError> {
        let logs = self.provider.get_logs(&filter).await?;
        tracing::debug!(event = E::SIGNATURE, logs = logs.len(), "queried logs");
        logs.iter().map(EventRecord::decode).collect()
    }

    async fn live_logs(&self, filter: &Filter) -> Result<BoxStream<'static, Log>, CheckerError> {
        if self.subscriptions {
            return Ok(self.provider.subscribe_logs(filter).await?.into_stream().boxed());
        }
        let poller = self
            .provider
            .watch_logs(filter)
            .await?
            .with_poll_interval(self.poll_interval);
        Ok(poller.into_stream().flat_map(stream::iter).boxed())
    }

    /// Live logs, preceded by `start..=head` when a start block is given.
    ///
    /// The live source is installed before the head snapshot, so every log
    /// lands in the backfill or the live stream. Live logs at or below the
    /// snapshot are dropped since the backfill already holds them.
    async fn logs(&self, filter: Filter, opts: &WatchOpts) -> Result<BoxStream<'static, Log>, CheckerError> {
        let live = self.live_logs(&filter).await?;
        let Some(start) = opts.start else {
            return Ok(live);
        };

        let head = self.provider.get_block_number().await?;
        let backlog = if start <= head {
            self.provider
                .get_logs(&filter.from_block(start).to_block(head))
                .await?
        } else {
            Vec::new()
        };
        tracing::debug!(start, head, backfilled = backlog.len(), "backfilled logs");
        Ok(stream::iter(backlog).chain(after_block(live, head)).boxed())
    }

    async fn watch<E>(&self, filter: Filter, opts: &WatchOpts) -> Result<EventWatch<E>, CheckerError>
    where
        E: SolEvent + Send + 'static,
    {
        let logs = self.logs(filter, opts).await?;
        tracing::debug!(event = E::SIGNATURE, subscriptions = self.subscriptions, "watching events");
        Ok(EventWatch::spawn(logs, |log: &Log| EventRecord::<E>::decode(log).map(Some)))
    }

    plain_event!(
        EntitlementCheckRequested,
        filter_entitlement_check_requested,
        watch_entitlement_check_requested,
        parse_entitlement_check_requested
    );

    plain_event!(
        EntitlementCheckRequestedV2,
        filter_entitlement_check_requested_v2,
        watch_entitlement_check_requested_v2,
        parse_entitlement_check_requested_v2
    );

    plain_event!(Initialized, filter_initialized, watch_initialized, parse_initialized);

    indexed_event!(
        InterfaceAdded,
        interface_id: FixedBytes<4> => interface_topics,
        filter_interface_added,
        watch_interface_added,
        parse_interface_added
    );

    indexed_event!(
        InterfaceRemoved,
        interface_id: FixedBytes<4> => interface_topics,
        filter_interface_removed,
        watch_interface_removed,
        parse_interface_removed
    );

    indexed_event!(
        NodeRegistered,
        node_address: Address => address_topics,
        filter_node_registered,
        watch_node_registered,
        parse_node_registered
    );

    indexed_event!(
        NodeUnregistered,
        node_address: Address => address_topics,
        filter_node_unregistered,
        watch_node_unregistered,
        parse_node_unregistered
    );

    /// Every checker event emitted in range, skipping logs with unknown topic0
    pub async fn filter_all(
        &self,
        opts: &FilterOpts,
    ) -> Result<Vec<EventRecord<EntitlementCheckerEvents>>, CheckerError> {
        let filter = with_range(Filter::new().address(self.address), opts);
        let logs = self.provider.get_logs(&filter).await?;

        let mut records = Vec::with_capacity(logs.len());
        for log in &logs {
            match EventRecord::decode_any(log)? {
                Some(record) => records.push(record),
                None => tracing::trace!(topic0 = ?log.topic0(), "skipping foreign log"),
            }
        }
        tracing::debug!(logs = logs.len(), events = records.len(), "queried all events");
        Ok(records)
    }

    /// Live stream of every checker event
    pub async fn watch_all(&self, opts: &WatchOpts) -> Result<EventWatch<EntitlementCheckerEvents>, CheckerError> {
        let logs = self.logs(Filter::new().address(self.address), opts).await?;
        Ok(EventWatch::spawn(
            logs,
            EventRecord::<EntitlementCheckerEvents>::decode_any,
        ))
    }
}
