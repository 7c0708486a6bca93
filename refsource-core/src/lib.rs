//! refsource-core: referral source attribution
//!
//! This crate provides the building blocks for attributing a page visit to
//! a traffic source and reporting it:
//!
//! - **Signal extraction** - [`AttributionContext`] built from the page URL,
//!   referrer, and user-agent the host has for the visit
//! - **Classification** - [`classify`] runs a fixed-priority rule cascade and
//!   always produces exactly one [`AttributionLabel`]
//! - **Delivery** - [`EventSink`] trait with [`MemorySink`] and
//!   [`MixpanelSink`] implementations
//! - **Coordination** - [`ReferralTracker`] polls sink readiness and emits
//!   the classified source at most once per session
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use refsource_core::{AttributionContext, MemorySink, ReferralTracker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let context = AttributionContext::from_parts(
//!         "https://embeddings.com.au/?utm_source=chatgpt.com",
//!         Some("https://chatgpt.com/"),
//!         "Mozilla/5.0",
//!     );
//!
//!     let sink = Arc::new(MemorySink::new());
//!     let tracker = ReferralTracker::with_defaults(sink);
//!
//!     // Infallible: a lost event must never break the page view.
//!     tracker.track(&context).await;
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! page URL / referrer / user-agent
//!         │
//!         ▼
//! ┌──────────────────┐    ┌─────────────────────┐    ┌─────────────────┐
//! │ AttributionContext│──▶│ classification       │──▶│ ReferralTracker │
//! │ (signals)         │   │ cascade (pure)       │   │ poll → emit once│
//! └──────────────────┘    └─────────────────────┘    └────────┬────────┘
//!                                                             ▼
//!                                                    EventSink (memory,
//!                                                    Mixpanel HTTP)
//! ```

pub mod classify;
pub mod error;
pub mod signals;
pub mod sink;
pub mod tracker;

// Re-export key types for convenience
pub use classify::{AttributionLabel, Classification, OwnedSite, cascade, classify, explain};
pub use error::SinkError;
pub use signals::AttributionContext;
pub use sink::{EventSink, MemorySink, MixpanelConfig, MixpanelSink, Properties, RecordedEvent};
pub use tracker::{
    PAGE_VIEW_EVENT, REFERRAL_EVENT, REFERRAL_PROPERTY, ReferralTracker, TrackerConfig,
    TrackerState, track_page_view,
};
