use std::io;

use rand::distributions::WeightedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),
    #[error("The product catalog is empty")]
    EmptyCatalog,
    #[error("Invalid event type weights")]
    InvalidWeights(#[from] WeightedError),
    #[error("Stream '{stream}' rejected the record: {message}")]
    Sink { stream: String, message: String },
}
