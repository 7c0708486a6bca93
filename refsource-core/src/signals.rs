//! Attribution signal extraction
//!
//! Builds an [`AttributionContext`] from the raw strings the host has for
//! the current page view. Parsing never fails outward: malformed input
//! degrades to absent signals, so attribution can never break a page load.

use std::collections::HashMap;

use tracing::warn;
use url::Url;

/// Raw attribution signals for a single page view
///
/// Read-only once constructed; classification consumes it by reference.
#[derive(Debug, Clone, Default)]
pub struct AttributionContext {
    query: HashMap<String, String>,
    referrer: String,
    user_agent: String,
}

impl AttributionContext {
    /// Build a context from the page URL, referrer, and user-agent
    ///
    /// A page URL that fails to parse yields a context with no query
    /// parameters. When a parameter repeats, the first occurrence wins.
    pub fn from_parts(page_url: &str, referrer: Option<&str>, user_agent: &str) -> Self {
        let query = match Url::parse(page_url) {
            Ok(url) => {
                let mut query = HashMap::new();
                for (name, value) in url.query_pairs() {
                    query.entry(name.into_owned()).or_insert(value.into_owned());
                }
                query
            }
            Err(e) => {
                warn!("Error parsing page URL, treating query parameters as absent: {e}");
                HashMap::new()
            }
        };

        Self {
            query,
            referrer: referrer.unwrap_or_default().to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The raw referrer, or an empty string if none was reported
    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    /// The raw user-agent string
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Lowercased hostname of the referrer, if the referrer parses as a URL
    pub fn referring_domain(&self) -> Option<String> {
        referring_domain(&self.referrer)
    }
}

/// Extract the lowercased hostname from a referrer URL
///
/// Returns `None` for an empty or unparsable referrer. The result carries
/// no scheme, path, or port.
pub fn referring_domain(referrer: &str) -> Option<String> {
    if referrer.is_empty() {
        return None;
    }

    match Url::parse(referrer) {
        Ok(url) => url.host_str().map(|host| host.to_ascii_lowercase()),
        Err(e) => {
            warn!("Error parsing referrer URL: {e}");
            None
        }
    }
}
