//! Blacklist CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::application::RegistryRuntime;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::BlacklistEntry;

#[derive(Args, Debug)]
pub struct BlacklistArgs {
    #[command(subcommand)]
    pub command: BlacklistCommands,
}

#[derive(Subcommand, Debug)]
pub enum BlacklistCommands {
    /// List blacklisted sources
    List,
}

#[derive(Debug, serde::Serialize)]
pub struct BlacklistListOutput {
    pub entries: Vec<BlacklistEntry>,
    pub total: usize,
}

impl CommandOutput for BlacklistListOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "Blacklist is empty.".to_string();
        }

        let mut lines = vec![format!("{} blacklisted source(s):\n", self.total)];
        lines.push(format!("{:<40} {:<10} {:<9} {}", "SOURCE", "REASON", "FAILURES", "LAST FAILURE"));
        lines.push("-".repeat(82));
        for entry in &self.entries {
            lines.push(format!(
                "{:<40} {:<10} {:<9} {}",
                truncate(&entry.identity.to_string(), 40),
                entry.reason.as_str(),
                entry.failure_count,
                entry.last_failure_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: BlacklistArgs, runtime: &RegistryRuntime, json_mode: bool) -> Result<()> {
    match args.command {
        BlacklistCommands::List => {
            let entries = runtime.blacklist.list().await.context("Failed to list blacklist")?;
            output(
                &BlacklistListOutput {
                    total: entries.len(),
                    entries,
                },
                json_mode,
            );
        }
    }
    Ok(())
}
