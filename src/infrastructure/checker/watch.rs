//! Live event delivery over a channel

use alloy::rpc::types::Log;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::checker::{CheckerError, EventRecord};

pub(crate) const WATCH_BUFFER: usize = 256;

pub type WatchItem<E> = Result<EventRecord<E>, CheckerError>;

/// Handle on a running log subscription.
///
/// Items arrive in log order. The first error is delivered and then the
/// channel closes. Dropping the handle stops the background task.
pub struct EventWatch<E> {
    receiver: mpsc::Receiver<WatchItem<E>>,
    task: JoinHandle<()>,
}

impl<E: Send + 'static> EventWatch<E> {
    pub(crate) fn spawn<F>(logs: BoxStream<'static, Log>, decode: F) -> Self
    where
        F: Fn(&Log) -> Result<Option<EventRecord<E>>, CheckerError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(WATCH_BUFFER);
        let task = tokio::spawn(forward(logs, decode, sender));
        Self { receiver, task }
    }

    /// Next event, or `None` once the watch has ended
    pub async fn next(&mut self) -> Option<WatchItem<E>> {
        self.receiver.recv().await
    }

    /// Stop the subscription
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<E> Drop for EventWatch<E> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn forward<E, F>(mut logs: BoxStream<'static, Log>, decode: F, sender: mpsc::Sender<WatchItem<E>>)
where
    F: Fn(&Log) -> Result<Option<EventRecord<E>>, CheckerError>,
{
    while let Some(log) = logs.next().await {
        let item = match decode(&log) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => continue,
            Err(err) => Err(err),
        };
        let failed = item.is_err();
        if sender.send(item).await.is_err() {
            tracing::debug!("event watch receiver dropped");
            return;
        }
        if failed {
            return;
        }
    }

    tracing::warn!("log stream ended");
    let _ = sender
        .send(Err(CheckerError::WatchClosed("log stream ended".to_string())))
        .await;
}
