use log::{debug, error};

use crate::error::SimError;
use crate::event::Event;

pub const DEFAULT_STREAM_NAME: &str = "ecommerce-events";

/// Acknowledgement returned by a [`Sink`] for one accepted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub shard_id: String,
    /// Ordering token assigned by the sink
    pub sequence_number: String,
}

/// A named-stream endpoint that accepts one record at a time.
pub trait Sink {
    /// # Errors
    /// Errors when the sink rejects the record or cannot be reached
    fn put_record(
        &mut self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<Receipt, SimError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn put_record(
        &mut self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<Receipt, SimError> {
        (**self).put_record(stream_name, partition_key, data)
    }
}

/// Sends serialized events to one stream, keyed by each event's `user_id`.
#[derive(Debug)]
pub struct Publisher<S> {
    sink: S,
    stream_name: String,
}

impl<S: Sink> Publisher<S> {
    #[must_use]
    pub fn new(sink: S, stream_name: impl Into<String>) -> Self {
        Publisher {
            sink,
            stream_name: stream_name.into(),
        }
    }

    /// # Errors
    /// Errors when the event cannot be serialized or the sink call fails.
    /// Failures are not retried.
    pub fn publish(&mut self, event: &Event) -> Result<Receipt, SimError> {
        let data = serde_json::to_vec(event)?;
        let partition_key = event.user_id.to_string();
        debug!(
            "Putting event {} ({} bytes) to '{}' with partition key {}",
            event.event_id,
            data.len(),
            self.stream_name,
            partition_key
        );
        self.sink
            .put_record(&self.stream_name, &partition_key, data)
            .inspect_err(|e| error!("Failed to publish event {}: {}", event.event_id, e))
    }

    #[must_use]
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// A record accepted by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub stream_name: String,
    pub partition_key: String,
    pub data: Vec<u8>,
    pub sequence_number: String,
}

/// In-process sink with a single shard and increasing sequence numbers.
///
/// `failing_at(n)` makes the n-th call (1-based) fail, leaving every earlier
/// record in place.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<StoredRecord>,
    calls: usize,
    fail_on_call: Option<usize>,
}

impl MemorySink {
    pub const SHARD_ID: &'static str = "shardId-000000000000";

    #[must_use]
    pub fn new() -> Self {
        MemorySink::default()
    }

    #[must_use]
    pub fn failing_at(call: usize) -> Self {
        MemorySink {
            fail_on_call: Some(call),
            ..MemorySink::default()
        }
    }

    #[must_use]
    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    /// Number of `put_record` calls made, including failed ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Sink for MemorySink {
    fn put_record(
        &mut self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<Receipt, SimError> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(SimError::Sink {
                stream: stream_name.to_owned(),
                message: format!("call {} refused", self.calls),
            });
        }

        let sequence_number = format!("{:056}", self.records.len() + 1);
        self.records.push(StoredRecord {
            stream_name: stream_name.to_owned(),
            partition_key: partition_key.to_owned(),
            data,
            sequence_number: sequence_number.clone(),
        });
        Ok(Receipt {
            shard_id: MemorySink::SHARD_ID.to_owned(),
            sequence_number,
        })
    }
}
