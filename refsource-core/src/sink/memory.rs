//! In-memory sink for tests and dry runs
//!
//! MemorySink records every emitted event and lets readiness be scripted,
//! enabling fast, deterministic testing of the emission coordinator.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use super::traits::{EventSink, Properties};
use crate::error::SinkError;

/// One event as it was handed to the sink
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub name: String,
    pub properties: Properties,
}

/// Recording sink with scriptable readiness
///
/// Defer readiness with [`ready_after`](MemorySink::ready_after) to exercise
/// polling, or force a delivery failure with
/// [`fail_next_emit`](MemorySink::fail_next_emit).
pub struct MemorySink {
    /// Readiness checks that report false before the sink comes up
    ready_after: u32,
    /// Readiness checks seen so far
    polls: AtomicU32,
    /// When set, the next emit fails (and clears the flag)
    fail_next_emit: AtomicBool,
    /// Events accepted so far
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemorySink {
    /// A sink that is ready immediately
    pub fn new() -> Self {
        Self::ready_after(0)
    }

    /// A sink whose first `polls` readiness checks report false
    pub fn ready_after(polls: u32) -> Self {
        Self {
            ready_after: polls,
            polls: AtomicU32::new(0),
            fail_next_emit: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        }
    }

    /// A sink that never becomes ready
    pub fn never_ready() -> Self {
        Self::ready_after(u32::MAX)
    }

    /// Make the next emit call fail
    pub fn fail_next_emit(&self) {
        self.fail_next_emit.store(true, Ordering::SeqCst);
    }

    /// Events accepted so far
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of events accepted so far
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Number of readiness checks observed
    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    fn is_ready(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst) >= self.ready_after
    }

    async fn emit(&self, event: &str, properties: Properties) -> Result<(), SinkError> {
        if self.fail_next_emit.swap(false, Ordering::SeqCst) {
            return Err(SinkError::Refused("scripted failure".to_string()));
        }

        self.events.lock().unwrap().push(RecordedEvent {
            name: event.to_string(),
            properties,
        });
        Ok(())
    }
}
