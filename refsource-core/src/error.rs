//! Error types for refsource-core

use thiserror::Error;

/// Errors surfaced by event sink implementations
///
/// These never reach the host application: the emission coordinator catches
/// every variant and downgrades it to a warning.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Event refused by sink: {0}")]
    Refused(String),

    #[error("Event rejected by ingestion endpoint: status {status}")]
    Rejected { status: u16 },

    #[error("Failed to deliver event: {0}")]
    Transport(#[from] reqwest::Error),
}
