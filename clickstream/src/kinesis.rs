//! Blocking [`Sink`] over AWS Kinesis Data Streams.
//!
//! Credentials come from the default provider chain (environment, profile,
//! instance or task role). Each `put_record` is a single `PutRecord` request
//! driven to completion on a private current-thread runtime.

use aws_config::BehaviorVersion;
use aws_sdk_kinesis::config::Region;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::Client;
use log::{debug, info};
use tokio::runtime::{Builder, Runtime};

use crate::error::SimError;
use crate::publisher::{Receipt, Sink};

pub const DEFAULT_REGION: &str = "us-east-1";

pub struct KinesisSink {
    client: Client,
    runtime: Runtime,
}

impl KinesisSink {
    /// # Errors
    /// Errors when the runtime backing the client cannot be started
    pub fn connect(region: &str) -> Result<Self, SimError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_owned()))
                .load(),
        );
        info!("Initialized Kinesis client for region {}", region);

        Ok(KinesisSink::from_client(Client::new(&config), runtime))
    }

    /// Wraps an already configured client; `runtime` drives its requests.
    #[must_use]
    pub fn from_client(client: Client, runtime: Runtime) -> Self {
        KinesisSink { client, runtime }
    }
}

impl Sink for KinesisSink {
    fn put_record(
        &mut self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<Receipt, SimError> {
        let request = self
            .client
            .put_record()
            .stream_name(stream_name)
            .partition_key(partition_key)
            .data(Blob::new(data))
            .send();
        let output = self
            .runtime
            .block_on(request)
            .map_err(|e| SimError::Sink {
                stream: stream_name.to_owned(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(
            "Record stored on {} with sequence number {}",
            output.shard_id(),
            output.sequence_number()
        );
        Ok(Receipt {
            shard_id: output.shard_id().to_owned(),
            sequence_number: output.sequence_number().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_kinesis::operation::put_record::{PutRecordError, PutRecordOutput};
    use aws_sdk_kinesis::types::error::ResourceNotFoundException;
    use aws_smithy_mocks::{mock, mock_client};

    fn runtime() -> Runtime {
        Builder::new_current_thread().enable_all().build().unwrap()
    }

    #[test]
    fn test_put_record_receipt() {
        let rule = mock!(Client::put_record)
            .match_requests(|req| {
                req.stream_name() == Some("ecommerce-events")
                    && req.partition_key() == Some("user-1")
                    && req.data().map(|d| d.as_ref()) == Some(&b"{}"[..])
            })
            .then_output(|| {
                PutRecordOutput::builder()
                    .shard_id("shardId-000000000003")
                    .sequence_number("49590338271490256608559692538361571095921575989136588898")
                    .build()
                    .unwrap()
            });
        let client = mock_client!(aws_sdk_kinesis, [&rule]);
        let mut sink = KinesisSink::from_client(client, runtime());

        let receipt = sink
            .put_record("ecommerce-events", "user-1", b"{}".to_vec())
            .unwrap();
        assert_eq!(receipt.shard_id, "shardId-000000000003");
        assert_eq!(
            receipt.sequence_number,
            "49590338271490256608559692538361571095921575989136588898"
        );
        assert_eq!(rule.num_calls(), 1);
    }

    #[test]
    fn test_missing_stream_is_sink_error() {
        let rule = mock!(Client::put_record).then_error(|| {
            PutRecordError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Stream missing-stream under account 123456789012 not found.")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_kinesis, [&rule]);
        let mut sink = KinesisSink::from_client(client, runtime());

        let err = sink
            .put_record("missing-stream", "user-1", b"{}".to_vec())
            .unwrap_err();
        match err {
            SimError::Sink { stream, message } => {
                assert_eq!(stream, "missing-stream");
                assert!(message.contains("not found"), "{}", message);
            }
            other => panic!("expected a sink error, got {:?}", other),
        }
        assert_eq!(rule.num_calls(), 1);
    }
}
