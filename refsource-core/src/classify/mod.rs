//! Referral source classification
//!
//! A fixed-priority cascade over the extracted signals. Classification is a
//! pure function of the context: no clock, no I/O, no hidden state. It is
//! also total: every context produces exactly one label, falling through to
//! [`AttributionLabel::DirectOrOther`] when nothing more specific matches.

mod label;
mod rules;

pub use label::{AttributionLabel, OwnedSite};
pub use rules::{Rule, cascade};

use serde::Serialize;

use crate::signals::AttributionContext;

/// Rule name reported when nothing in the cascade matched
pub const CATCH_ALL_RULE: &str = "catch-all";

/// A label together with the cascade rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Name of the first rule that matched, or [`CATCH_ALL_RULE`]
    pub rule: &'static str,
    pub label: AttributionLabel,
}

/// Classify a page view
pub fn classify(context: &AttributionContext) -> AttributionLabel {
    explain(context).label
}

/// Classify a page view, reporting which rule decided
pub fn explain(context: &AttributionContext) -> Classification {
    for rule in cascade() {
        if let Some(label) = rule.evaluate(context) {
            return Classification {
                rule: rule.name(),
                label,
            };
        }
    }

    Classification {
        rule: CATCH_ALL_RULE,
        label: AttributionLabel::DirectOrOther,
    }
}
