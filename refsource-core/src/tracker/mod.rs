//! Emission coordination
//!
//! Delivers the classified referral source to the event sink at most once
//! per session, polling sink readiness up to a bounded number of attempts.

mod config;
mod coordinator;

pub use config::TrackerConfig;
pub use coordinator::{
    PAGE_VIEW_EVENT, REFERRAL_EVENT, REFERRAL_PROPERTY, ReferralTracker, TrackerState,
    track_page_view,
};
