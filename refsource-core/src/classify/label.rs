//! Attribution labels
//!
//! The closed set of source names a visit can classify as. The wire strings
//! returned by [`AttributionLabel::as_str`] are fixed: downstream dashboards
//! group on them.

use std::fmt;

use serde::{Serialize, Serializer};

/// Owned and sibling sites, tracked by their bare domain name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedSite {
    EmbeddingsComAu,
    EmbeddingAu,
    EmbeddingsAu,
    ProcessAu,
    PerformantComAu,
    PerformantAu,
    DocumentAu,
    LlmsAu,
    AutogenAu,
    AutogenComAu,
    AgentopsAu,
    AgentopsComAu,
}

impl OwnedSite {
    /// Every owned site, in match order
    pub const ALL: [OwnedSite; 12] = [
        OwnedSite::EmbeddingsComAu,
        OwnedSite::EmbeddingAu,
        OwnedSite::EmbeddingsAu,
        OwnedSite::ProcessAu,
        OwnedSite::PerformantComAu,
        OwnedSite::PerformantAu,
        OwnedSite::DocumentAu,
        OwnedSite::LlmsAu,
        OwnedSite::AutogenAu,
        OwnedSite::AutogenComAu,
        OwnedSite::AgentopsAu,
        OwnedSite::AgentopsComAu,
    ];

    /// The bare domain this site is served from
    pub fn domain(self) -> &'static str {
        match self {
            OwnedSite::EmbeddingsComAu => "embeddings.com.au",
            OwnedSite::EmbeddingAu => "embedding.au",
            OwnedSite::EmbeddingsAu => "embeddings.au",
            OwnedSite::ProcessAu => "process.au",
            OwnedSite::PerformantComAu => "performant.com.au",
            OwnedSite::PerformantAu => "performant.au",
            OwnedSite::DocumentAu => "document.au",
            OwnedSite::LlmsAu => "llms.au",
            OwnedSite::AutogenAu => "autogen.au",
            OwnedSite::AutogenComAu => "autogen.com.au",
            OwnedSite::AgentopsAu => "agentops.au",
            OwnedSite::AgentopsComAu => "agentops.com.au",
        }
    }

    /// Exact-match a referring domain, treating a `www.` prefix as equivalent
    ///
    /// Exact match only: `notembeddings.au` does not match `embeddings.au`.
    pub fn matching(referring_domain: &str) -> Option<OwnedSite> {
        let bare = referring_domain
            .strip_prefix("www.")
            .unwrap_or(referring_domain);
        Self::ALL.into_iter().find(|site| site.domain() == bare)
    }

    /// Exact-match a campaign source value (no `www.` equivalence)
    pub fn from_campaign_source(source: &str) -> Option<OwnedSite> {
        Self::ALL.into_iter().find(|site| site.domain() == source)
    }
}

/// The classified source of a page visit
///
/// Exactly one label is produced per page view, immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionLabel {
    Facebook,
    Google,
    Bing,
    ChatGpt,
    Perplexity,
    DeepSeek,
    /// legalgenie.com.au, the sibling product's marketing site
    LegalGenie,
    /// app.legalgenie.com.au, the product itself
    LegalGenieApp,
    /// A visit referred from one of our own sites
    Owned(OwnedSite),
    /// Catch-all when no rule recognizes the visit
    DirectOrOther,
}

impl AttributionLabel {
    /// The wire string carried in the emitted event
    pub fn as_str(self) -> &'static str {
        match self {
            AttributionLabel::Facebook => "Facebook",
            AttributionLabel::Google => "Google",
            AttributionLabel::Bing => "Bing",
            AttributionLabel::ChatGpt => "ChatGPT",
            AttributionLabel::Perplexity => "Perplexity",
            AttributionLabel::DeepSeek => "DeepSeek",
            AttributionLabel::LegalGenie => "Legal Genie",
            AttributionLabel::LegalGenieApp => "Legal Genie App",
            AttributionLabel::Owned(site) => site.domain(),
            AttributionLabel::DirectOrOther => "Direct or Other",
        }
    }
}

impl fmt::Display for AttributionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Serializes as the wire string, matching the emitted event payload.
impl Serialize for AttributionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
