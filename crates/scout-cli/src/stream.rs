//! Incremental output of result records.
//!
//! While a [`StreamGuard`] is active, business logic hands records to an
//! [`Emitter`] and a dedicated consumer task writes each one to the sink as a
//! single NDJSON line, flushed immediately. Items carrying an error are logged
//! and skipped; they never stop the stream.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::output::write_record;

/// Where streamed records go.
pub type Sink = Box<dyn Write + Send>;

/// Records the emitter may queue ahead of the writer.
const BUFFER: usize = 1;

/// One streamed record, or the reason it could not be produced.
#[derive(Debug)]
pub struct StreamItem {
    pub data: serde_json::Value,
    pub error: Option<anyhow::Error>,
}

impl StreamItem {
    pub const fn ok(data: serde_json::Value) -> Self {
        Self { data, error: None }
    }

    pub const fn failed(error: anyhow::Error) -> Self {
        Self {
            data: serde_json::Value::Null,
            error: Some(error),
        }
    }
}

enum Signal {
    Item(StreamItem),
    Done,
}

/// Write end of the stream.
#[derive(Clone)]
pub struct Emitter {
    tx: mpsc::Sender<Signal>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter").finish_non_exhaustive()
    }
}

impl Emitter {
    /// Queue one record. Serialization failures become per-item errors.
    pub async fn emit<T: Serialize>(&self, record: &T) {
        let item = match serde_json::to_value(record) {
            Ok(data) => StreamItem::ok(data),
            Err(err) => StreamItem::failed(err.into()),
        };
        self.send(item).await;
    }

    /// Report a record that could not be produced.
    pub async fn emit_error(&self, error: anyhow::Error) {
        self.send(StreamItem::failed(error)).await;
    }

    pub async fn send(&self, item: StreamItem) {
        if self.tx.send(Signal::Item(item)).await.is_err() {
            debug!("stream item dropped, writer already stopped");
        }
    }
}

/// Owns the writer task of an active stream. Inactive guards do nothing.
#[derive(Debug, Default)]
pub struct StreamGuard {
    tx: Option<mpsc::Sender<Signal>>,
    consumer: Option<JoinHandle<()>>,
}

impl StreamGuard {
    /// A guard with no task behind it.
    pub const fn inactive() -> Self {
        Self {
            tx: None,
            consumer: None,
        }
    }

    /// Spawn the writer task for `sink`. When disabled nothing is spawned and
    /// the returned guard is inactive.
    pub fn start(enabled: bool, sink: Sink) -> (Option<Emitter>, Self) {
        if !enabled {
            return (None, Self::inactive());
        }
        let (tx, mut rx) = mpsc::channel::<Signal>(BUFFER);

        let consumer = tokio::spawn(async move {
            let mut sink = sink;
            while let Some(signal) = rx.recv().await {
                match signal {
                    Signal::Item(StreamItem { error: Some(err), .. }) => {
                        debug!(error = %err, "skipping stream item");
                    }
                    Signal::Item(item) => {
                        if let Err(err) = write_record(&mut sink, &item.data) {
                            warn!(error = %err, "stream output closed");
                            break;
                        }
                    }
                    Signal::Done => break,
                }
            }
        });

        let guard = Self {
            tx: Some(tx.clone()),
            consumer: Some(consumer),
        };
        (Some(Emitter { tx }), guard)
    }

    pub const fn is_active(&self) -> bool {
        self.consumer.is_some()
    }

    /// Wait until every queued record is written. Idempotent; `outcome` is only logged.
    pub async fn stop(&mut self, outcome: Option<&anyhow::Error>) {
        let Some(consumer) = self.consumer.take() else {
            return;
        };
        if let Some(err) = outcome {
            debug!(error = %err, "streaming operation finished with error");
        }
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Signal::Done).await;
        }
        if let Err(err) = consumer.await {
            debug!(error = %err, "stream writer ended abnormally");
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
        }
    }
}
