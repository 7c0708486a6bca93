//! The emission coordinator state machine
//!
//! Classifies once, then polls the sink and emits the result at most once.
//! Nothing here returns an error to the host: attribution is best-effort
//! telemetry and a lost event must never break a page view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::config::TrackerConfig;
use crate::classify;
use crate::signals::AttributionContext;
use crate::sink::{EventSink, Properties};

/// Event name carried on the wire
pub const REFERRAL_EVENT: &str = "Referral Source Identified";

/// Property key the classified label is carried under
pub const REFERRAL_PROPERTY: &str = "Referral Source";

/// Event name for navigation events
pub const PAGE_VIEW_EVENT: &str = "Page View";

/// Lifecycle of one tracking run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerState {
    /// Not started
    Idle,
    /// Waiting for the sink to become ready
    Polling { attempts: u32 },
    /// The emit call was made; terminal
    Emitted,
    /// Retry budget exhausted before the sink was ready; terminal
    Abandoned,
}

/// Delivers the classified referral source for one page view
///
/// One tracker corresponds to one session. [`track`](ReferralTracker::track)
/// is idempotent per instance: the guard flips before any await point, so a
/// repeated or concurrent call can never spend a second emit.
pub struct ReferralTracker {
    sink: Arc<dyn EventSink>,
    config: TrackerConfig,
    started: AtomicBool,
    state: RwLock<TrackerState>,
}

impl ReferralTracker {
    pub fn new(sink: Arc<dyn EventSink>, config: TrackerConfig) -> Self {
        Self {
            sink,
            config,
            started: AtomicBool::new(false),
            state: RwLock::new(TrackerState::Idle),
        }
    }

    /// Tracker with the default polling policy
    pub fn with_defaults(sink: Arc<dyn EventSink>) -> Self {
        Self::new(sink, TrackerConfig::default())
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackerState {
        *self.state.read().unwrap()
    }

    fn set_state(&self, state: TrackerState) {
        *self.state.write().unwrap() = state;
    }

    /// Classify the visit and deliver it, at most once
    ///
    /// Returns the terminal state reached, or, for a repeated call, the
    /// state the first call has reached so far.
    pub async fn track(&self, context: &AttributionContext) -> TrackerState {
        if self.started.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        // Classification happens exactly once, before the first readiness
        // check, and is pure: the label cannot change between retries.
        let label = classify::classify(context);

        for attempt in 1..=self.config.max_attempts {
            if self.sink.is_ready() {
                // Terminal before the emit call: no path can double-emit.
                self.set_state(TrackerState::Emitted);

                let mut properties = Properties::new();
                properties.insert(
                    REFERRAL_PROPERTY.to_string(),
                    Value::from(label.as_str()),
                );

                match self.sink.emit(REFERRAL_EVENT, properties).await {
                    Ok(()) => debug!(source = label.as_str(), "referral source delivered"),
                    Err(e) => warn!("Failed to track referral source: {e}"),
                }
                return TrackerState::Emitted;
            }

            if attempt < self.config.max_attempts {
                self.set_state(TrackerState::Polling { attempts: attempt });
                tokio::time::sleep(self.config.interval()).await;
            }
        }

        warn!(
            attempts = self.config.max_attempts,
            "Maximum attempts reached. Unable to track referral source."
        );
        self.set_state(TrackerState::Abandoned);
        TrackerState::Abandoned
    }
}

/// Emit a page-view event for a navigation
///
/// Single shot, no polling: navigations after startup can assume the sink
/// either is ready or has already given up. Returns whether the event was
/// handed to the sink.
pub async fn track_page_view(sink: &dyn EventSink, path: &str) -> bool {
    if !sink.is_ready() {
        warn!(path, "sink not ready, page view dropped");
        return false;
    }

    let mut properties = Properties::new();
    properties.insert("url".to_string(), Value::from(path));
    properties.insert("page".to_string(), Value::from(path));
    properties.insert(
        "timestamp".to_string(),
        Value::from(Utc::now().to_rfc3339()),
    );

    match sink.emit(PAGE_VIEW_EVENT, properties).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to track page view: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn direct_context() -> AttributionContext {
        AttributionContext::from_parts(
            "https://embeddings.com.au/",
            None,
            "Mozilla/5.0 (X11; Linux x86_64)",
        )
    }

    #[tokio::test]
    async fn starts_idle() {
        let tracker = ReferralTracker::with_defaults(Arc::new(MemorySink::new()));
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[tokio::test]
    async fn ready_sink_emits_on_first_attempt() {
        let sink = Arc::new(MemorySink::new());
        let tracker = ReferralTracker::with_defaults(Arc::clone(&sink) as Arc<dyn EventSink>);

        let state = tracker.track(&direct_context()).await;

        assert_eq!(state, TrackerState::Emitted);
        assert_eq!(sink.poll_count(), 1);
        assert_eq!(sink.event_count(), 1);
    }

    #[tokio::test]
    async fn emit_failure_is_swallowed_and_terminal() {
        let sink = Arc::new(MemorySink::new());
        sink.fail_next_emit();
        let tracker = ReferralTracker::with_defaults(Arc::clone(&sink) as Arc<dyn EventSink>);

        let state = tracker.track(&direct_context()).await;

        assert_eq!(state, TrackerState::Emitted);
        assert_eq!(sink.event_count(), 0);
        assert_eq!(tracker.state(), TrackerState::Emitted);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempt_budget_abandons_without_polling() {
        let sink = Arc::new(MemorySink::new());
        let config = TrackerConfig {
            max_attempts: 0,
            interval_ms: 100,
        };
        let tracker = ReferralTracker::new(Arc::clone(&sink) as Arc<dyn EventSink>, config);

        let state = tracker.track(&direct_context()).await;

        assert_eq!(state, TrackerState::Abandoned);
        assert_eq!(sink.poll_count(), 0);
    }

    #[tokio::test]
    async fn page_view_event_carries_path_and_timestamp() {
        let sink = MemorySink::new();

        assert!(track_page_view(&sink, "/process").await);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, PAGE_VIEW_EVENT);
        assert_eq!(events[0].properties.get("url"), Some(&Value::from("/process")));
        assert_eq!(events[0].properties.get("page"), Some(&Value::from("/process")));
        assert!(events[0].properties.contains_key("timestamp"));
    }

    #[tokio::test]
    async fn page_view_dropped_when_sink_not_ready() {
        let sink = MemorySink::never_ready();

        assert!(!track_page_view(&sink, "/about").await);
        assert_eq!(sink.event_count(), 0);
    }
}
