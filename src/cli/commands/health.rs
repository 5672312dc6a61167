//! Health CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::application::RegistryRuntime;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::SweepStats;

#[derive(Args, Debug)]
pub struct HealthArgs {
    #[command(subcommand)]
    pub command: HealthCommands,
}

#[derive(Subcommand, Debug)]
pub enum HealthCommands {
    /// Probe every Tier1 source and blacklist the ones that stay down
    Sweep,
    /// Re-probe blacklisted sources past their cooldown
    Resurrect,
}

#[derive(Debug, serde::Serialize)]
pub struct SweepOutput {
    pub pass: &'static str,
    #[serde(flatten)]
    pub stats: SweepStats,
}

impl CommandOutput for SweepOutput {
    fn to_human(&self) -> String {
        let s = &self.stats;
        let mut lines = vec![
            format!("Health {} finished", self.pass),
            format!("  Checked:         {}", s.checked),
            format!("  Healthy:         {}", s.healthy),
            format!("  Skipped:         {}", s.skipped),
        ];
        match self.pass {
            "sweep" => {
                lines.push(format!("  Newly unhealthy: {}", s.newly_unhealthy));
                lines.push(format!("  Recovered:       {}", s.recovered));
                lines.push(format!("  Blacklisted:     {}", s.blacklisted));
            }
            _ => lines.push(format!("  Resurrected:     {}", s.resurrected)),
        }
        if s.store_errors > 0 {
            lines.push(format!("  Store errors:    {}", s.store_errors));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: HealthArgs, runtime: &RegistryRuntime, json_mode: bool) -> Result<()> {
    let out = match args.command {
        HealthCommands::Sweep => SweepOutput {
            pass: "sweep",
            stats: runtime.sweeper.sweep_tier1().await,
        },
        HealthCommands::Resurrect => SweepOutput {
            pass: "resurrection",
            stats: runtime.sweeper.attempt_resurrections().await,
        },
    };
    output(&out, json_mode);
    Ok(())
}
