//! Discovery CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::application::RegistryRuntime;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::DiscoveryStats;

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[command(subcommand)]
    pub command: DiscoverCommands,
}

#[derive(Subcommand, Debug)]
pub enum DiscoverCommands {
    /// Run one discovery pass over the catalog and user interests
    Run {
        /// Extra interest to include (repeatable)
        #[arg(short, long)]
        interest: Vec<String>,
        /// Skip the built-in catalog and use only the given interests
        #[arg(long)]
        only: bool,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct DiscoveryOutput {
    #[serde(flatten)]
    pub stats: DiscoveryStats,
}

impl CommandOutput for DiscoveryOutput {
    fn to_human(&self) -> String {
        let stats = &self.stats;
        let mut lines = vec![
            format!("Discovery run {}", stats.run_id),
            format!("  Interests processed: {}", stats.interests_processed),
            format!("  Candidates found:    {}", stats.total_discovered),
            format!("  Healthy:             {}", stats.healthy),
            format!("  Auto-promoted:       {}", stats.auto_promoted),
            format!("  Channel failures:    {}", stats.channel_failures),
            format!("  Duration:            {:.1}s", stats.duration.as_secs_f64()),
        ];
        if let Some(anomaly) = stats.anomaly {
            lines.push(format!("  Anomaly:             {anomaly:?}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: DiscoverArgs, runtime: &RegistryRuntime, json_mode: bool) -> Result<()> {
    match args.command {
        DiscoverCommands::Run { interest, only } => {
            let stats = if only {
                runtime.orchestrator.run_discovery(&interest).await
            } else {
                let user = runtime.user_interests.iter().chain(interest.iter());
                runtime.orchestrator.run_scheduled(user).await
            };
            output(&DiscoveryOutput { stats }, json_mode);
        }
    }
    Ok(())
}
