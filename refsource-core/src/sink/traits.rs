//! EventSink trait definition

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SinkError;

/// Properties attached to an emitted event
pub type Properties = Map<String, Value>;

/// An external analytics event sink
///
/// Implementations own delivery; callers own the at-most-once policy. The
/// sink is treated as append-only: the core never mutates sink state beyond
/// these two operations.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Whether the sink can accept events right now
    ///
    /// Must be cheap: the emission coordinator polls this on a timer while
    /// the sink starts up.
    fn is_ready(&self) -> bool;

    /// Deliver one event with its properties
    async fn emit(&self, event: &str, properties: Properties) -> Result<(), SinkError>;
}
