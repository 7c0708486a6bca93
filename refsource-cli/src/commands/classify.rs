//! `refsource classify` - classify a visit from its raw signals

use anyhow::Result;
use clap::Args;
use refsource_core::{AttributionContext, explain};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Full page URL of the visit, including any query string
    #[arg(long)]
    pub url: String,

    /// Referrer reported for the visit
    #[arg(long)]
    pub referrer: Option<String>,

    /// User-agent of the visiting browser
    #[arg(long, default_value = "")]
    pub user_agent: String,

    /// Print the label and the deciding rule as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    let context =
        AttributionContext::from_parts(&args.url, args.referrer.as_deref(), &args.user_agent);
    let classification = explain(&context);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!("{}", classification.label);
    }

    Ok(())
}
