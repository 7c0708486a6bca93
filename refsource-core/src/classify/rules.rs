//! The classification cascade
//!
//! Ordered rules, first match wins, no backtracking. The ordering is
//! business policy: explicit signals outrank sibling-site identity, which
//! outranks partner identity, which outranks heuristic inference. Reordering
//! changes observable classifications for ambiguous traffic.

use super::label::{AttributionLabel, OwnedSite};
use crate::signals::AttributionContext;

/// Query parameter injected by Facebook's ad redirects
const FACEBOOK_CLICK_ID: &str = "fbclid";

/// Operator-supplied campaign source parameter
const CAMPAIGN_SOURCE: &str = "utm_source";

/// Partner product hosts, most specific first
const PARTNER_DOMAINS: [(&str, AttributionLabel); 2] = [
    ("app.legalgenie.com.au", AttributionLabel::LegalGenieApp),
    ("legalgenie.com.au", AttributionLabel::LegalGenie),
];

/// Referring-domain substrings checked after the exact-match rules
const PLATFORM_DOMAINS: [(&str, AttributionLabel); 5] = [
    ("chatgpt.com", AttributionLabel::ChatGpt),
    ("perplexity.ai", AttributionLabel::Perplexity),
    ("deepseek.com", AttributionLabel::DeepSeek),
    ("google.com", AttributionLabel::Google),
    ("bing.com", AttributionLabel::Bing),
];

/// One step of the cascade: a named predicate producing a label on match
pub struct Rule {
    name: &'static str,
    matcher: fn(&AttributionContext) -> Option<AttributionLabel>,
}

impl Rule {
    /// Stable name of this rule, reported by [`explain`](super::explain)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run this rule against a context
    pub fn evaluate(&self, context: &AttributionContext) -> Option<AttributionLabel> {
        (self.matcher)(context)
    }
}

/// The cascade, in evaluation order
pub fn cascade() -> &'static [Rule] {
    &CASCADE
}

static CASCADE: [Rule; 5] = [
    Rule {
        name: "paid-click",
        matcher: paid_click,
    },
    Rule {
        name: "campaign-source",
        matcher: campaign_source,
    },
    Rule {
        name: "owned-domain",
        matcher: owned_domain,
    },
    Rule {
        name: "partner-domain",
        matcher: partner_domain,
    },
    Rule {
        name: "platform-heuristic",
        matcher: platform_heuristic,
    },
];

// Presence alone is decisive; only Facebook's redirect injects fbclid, so
// the value is never inspected.
fn paid_click(context: &AttributionContext) -> Option<AttributionLabel> {
    context
        .query_param(FACEBOOK_CLICK_ID)
        .filter(|id| !id.is_empty())
        .map(|_| AttributionLabel::Facebook)
}

fn campaign_source(context: &AttributionContext) -> Option<AttributionLabel> {
    let source = context
        .query_param(CAMPAIGN_SOURCE)
        .filter(|source| !source.is_empty())?
        .to_ascii_lowercase();

    let label = match source.as_str() {
        "chatgpt.com" => AttributionLabel::ChatGpt,
        "perplexity.ai" => AttributionLabel::Perplexity,
        "deepseek.com" => AttributionLabel::DeepSeek,
        "app.legalgenie.com.au" => AttributionLabel::LegalGenieApp,
        "legalgenie.com.au" => AttributionLabel::LegalGenie,
        other => match OwnedSite::from_campaign_source(other) {
            Some(site) => AttributionLabel::Owned(site),
            // An explicit campaign source we don't recognize still ends the
            // cascade here; the referrer is never consulted.
            None => AttributionLabel::DirectOrOther,
        },
    };

    Some(label)
}

fn owned_domain(context: &AttributionContext) -> Option<AttributionLabel> {
    let domain = context.referring_domain()?;
    OwnedSite::matching(&domain).map(AttributionLabel::Owned)
}

fn partner_domain(context: &AttributionContext) -> Option<AttributionLabel> {
    let domain = context.referring_domain()?;
    let bare = domain.strip_prefix("www.").unwrap_or(&domain);
    PARTNER_DOMAINS
        .into_iter()
        .find(|(host, _)| *host == bare)
        .map(|(_, label)| label)
}

fn platform_heuristic(context: &AttributionContext) -> Option<AttributionLabel> {
    let domain = context.referring_domain().unwrap_or_default();

    // Facebook's in-app browser often strips the referrer, so the
    // user-agent is consulted as well.
    let user_agent = context.user_agent().to_ascii_lowercase();
    if domain.contains("facebook.com")
        || user_agent.contains("fb")
        || user_agent.contains("facebook")
    {
        return Some(AttributionLabel::Facebook);
    }

    PLATFORM_DOMAINS
        .into_iter()
        .find(|(needle, _)| domain.contains(needle))
        .map(|(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(page_url: &str, referrer: Option<&str>, user_agent: &str) -> AttributionContext {
        AttributionContext::from_parts(page_url, referrer, user_agent)
    }

    #[test]
    fn paid_click_requires_non_empty_value() {
        let with_id = context("https://embeddings.com.au/?fbclid=abc123", None, "");
        assert_eq!(paid_click(&with_id), Some(AttributionLabel::Facebook));

        let empty = context("https://embeddings.com.au/?fbclid=", None, "");
        assert_eq!(paid_click(&empty), None);
    }

    #[test]
    fn campaign_source_is_case_insensitive() {
        let ctx = context("https://embeddings.com.au/?utm_source=ChatGPT.com", None, "");
        assert_eq!(campaign_source(&ctx), Some(AttributionLabel::ChatGpt));
    }

    #[test]
    fn campaign_source_unrecognized_value_is_catch_all() {
        let ctx = context(
            "https://embeddings.com.au/?utm_source=newsletter123",
            None,
            "",
        );
        assert_eq!(campaign_source(&ctx), Some(AttributionLabel::DirectOrOther));
    }

    #[test]
    fn campaign_source_empty_value_is_skipped() {
        let ctx = context("https://embeddings.com.au/?utm_source=", None, "");
        assert_eq!(campaign_source(&ctx), None);
    }

    #[test]
    fn campaign_source_maps_owned_domains() {
        let ctx = context("https://embeddings.com.au/?utm_source=llms.au", None, "");
        assert_eq!(
            campaign_source(&ctx),
            Some(AttributionLabel::Owned(OwnedSite::LlmsAu))
        );
    }

    #[test]
    fn owned_domain_requires_referrer() {
        let ctx = context("https://embeddings.com.au/", None, "");
        assert_eq!(owned_domain(&ctx), None);
    }

    #[test]
    fn partner_domain_prefers_the_app_host() {
        let app = context(
            "https://embeddings.com.au/",
            Some("https://app.legalgenie.com.au/matters"),
            "",
        );
        assert_eq!(partner_domain(&app), Some(AttributionLabel::LegalGenieApp));

        let site = context(
            "https://embeddings.com.au/",
            Some("https://www.legalgenie.com.au/pricing"),
            "",
        );
        assert_eq!(partner_domain(&site), Some(AttributionLabel::LegalGenie));
    }

    #[test]
    fn platform_heuristic_matches_facebook_by_user_agent_alone() {
        let ctx = context(
            "https://embeddings.com.au/",
            None,
            "Mozilla/5.0 [FB_IAB/FB4A;FBAV/400.0]",
        );
        assert_eq!(
            platform_heuristic(&ctx),
            Some(AttributionLabel::Facebook)
        );
    }

    #[test]
    fn platform_heuristic_matches_search_engines_by_domain_substring() {
        let google = context(
            "https://embeddings.com.au/",
            Some("https://www.google.com/search?q=vector+db"),
            "Mozilla/5.0 (X11; Linux x86_64)",
        );
        assert_eq!(platform_heuristic(&google), Some(AttributionLabel::Google));

        let bing = context(
            "https://embeddings.com.au/",
            Some("https://www.bing.com/search?q=vector+db"),
            "Mozilla/5.0 (X11; Linux x86_64)",
        );
        assert_eq!(platform_heuristic(&bing), Some(AttributionLabel::Bing));
    }

    #[test]
    fn platform_heuristic_checks_facebook_before_search_engines() {
        // A facebook.com referrer plus a googlebot-free UA: facebook wins
        // because it is evaluated first within the heuristic.
        let ctx = context(
            "https://embeddings.com.au/",
            Some("https://m.facebook.com/"),
            "Mozilla/5.0 (X11; Linux x86_64)",
        );
        assert_eq!(platform_heuristic(&ctx), Some(AttributionLabel::Facebook));
    }

    #[test]
    fn cascade_order_is_stable() {
        let names: Vec<&str> = cascade().iter().map(Rule::name).collect();
        assert_eq!(
            names,
            [
                "paid-click",
                "campaign-source",
                "owned-domain",
                "partner-domain",
                "platform-heuristic",
            ]
        );
    }
}
