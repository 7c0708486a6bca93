//! `refsource track` - run the full pipeline against a sink

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use refsource_core::{
    AttributionContext, EventSink, MemorySink, MixpanelConfig, MixpanelSink, ReferralTracker,
    TrackerConfig, TrackerState,
};

#[derive(Args)]
pub struct TrackArgs {
    /// Full page URL of the visit, including any query string
    #[arg(long)]
    pub url: String,

    /// Referrer reported for the visit
    #[arg(long)]
    pub referrer: Option<String>,

    /// User-agent of the visiting browser
    #[arg(long, default_value = "")]
    pub user_agent: String,

    /// Mixpanel project token
    #[arg(long, conflicts_with = "dry_run")]
    pub token: Option<String>,

    /// Mixpanel ingestion host
    #[arg(long)]
    pub api_host: Option<String>,

    /// Record to an in-memory sink and print what would be sent
    #[arg(long)]
    pub dry_run: bool,

    /// Readiness checks before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Delay between readiness checks, in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

pub async fn run(args: TrackArgs) -> Result<()> {
    let mut config = TrackerConfig::default();
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = interval_ms;
    }

    let context =
        AttributionContext::from_parts(&args.url, args.referrer.as_deref(), &args.user_agent);

    let memory = args.dry_run.then(|| Arc::new(MemorySink::new()));
    let sink: Arc<dyn EventSink> = match (&memory, &args.token) {
        (Some(memory), _) => Arc::clone(memory) as Arc<dyn EventSink>,
        (None, Some(token)) => {
            let mut mixpanel = MixpanelConfig::new(token.clone());
            if let Some(api_host) = &args.api_host {
                mixpanel.api_host = api_host.clone();
            }
            Arc::new(MixpanelSink::new(mixpanel))
        }
        (None, None) => bail!("pass --token to deliver to Mixpanel, or --dry-run"),
    };

    let tracker = ReferralTracker::new(sink, config);
    match tracker.track(&context).await {
        TrackerState::Emitted => println!("emitted"),
        TrackerState::Abandoned => println!("abandoned: sink never became ready"),
        other => println!("{other:?}"),
    }

    if let Some(memory) = memory {
        for event in memory.events() {
            println!("{} {}", event.name, serde_json::to_string(&event.properties)?);
        }
    }

    Ok(())
}
