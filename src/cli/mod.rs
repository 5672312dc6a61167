//! Command-line front end.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    blacklist::BlacklistArgs, discover::DiscoverArgs, health::HealthArgs, route::RouteArgs, tier1::Tier1Args,
};

#[derive(Parser, Debug)]
#[command(name = "source-registry")]
#[command(about = "Self-updating registry of content sources", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .source-registry/
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run source discovery
    Discover(DiscoverArgs),
    /// Decide how a newsletter request is sourced
    Route(RouteArgs),
    /// Inspect the Tier1 registry
    Tier1(Tier1Args),
    /// Inspect the blacklist
    Blacklist(BlacklistArgs),
    /// Health sweeps and resurrection
    Health(HealthArgs),
    /// Registry-wide counters
    Metrics,
}

/// Print a failed command's error chain and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1);
}
