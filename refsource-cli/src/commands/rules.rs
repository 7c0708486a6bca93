//! `refsource rules` - show the cascade as data

use anyhow::Result;
use clap::Args;
use refsource_core::cascade;

#[derive(Args)]
pub struct RulesArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RulesArgs) -> Result<()> {
    let names: Vec<&str> = cascade().iter().map(|rule| rule.name()).collect();

    if args.json {
        println!("{}", serde_json::to_string(&names)?);
    } else {
        for (position, name) in names.iter().enumerate() {
            println!("{}. {name}", position + 1);
        }
    }

    Ok(())
}
