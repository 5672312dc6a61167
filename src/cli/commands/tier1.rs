//! Tier1 registry CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::application::RegistryRuntime;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{CoverageReport, Tier1Entry};

#[derive(Args, Debug)]
pub struct Tier1Args {
    #[command(subcommand)]
    pub command: Tier1Commands,
}

#[derive(Subcommand, Debug)]
pub enum Tier1Commands {
    /// List Tier1 sources
    List {
        /// Only healthy sources
        #[arg(long)]
        healthy: bool,
    },
    /// Coverage of the given interests
    Coverage {
        /// Interest to check (repeatable)
        #[arg(short, long, required = true)]
        interest: Vec<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct Tier1ListOutput {
    pub sources: Vec<Tier1Entry>,
    pub total: usize,
}

impl CommandOutput for Tier1ListOutput {
    fn to_human(&self) -> String {
        if self.sources.is_empty() {
            return "No tier1 sources found.".to_string();
        }

        let mut lines = vec![format!("Found {} tier1 source(s):\n", self.total)];
        lines.push(format!("{:<40} {:<6} {:<8} {}", "SOURCE", "SCORE", "HEALTHY", "INTERESTS"));
        lines.push("-".repeat(90));
        for entry in &self.sources {
            let interests: Vec<&str> = entry.interests.iter().map(String::as_str).collect();
            lines.push(format!(
                "{:<40} {:<6.1} {:<8} {}",
                truncate(&entry.identity.to_string(), 40),
                entry.quality_score,
                if entry.is_healthy { "yes" } else { "no" },
                truncate(&interests.join(", "), 40)
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CoverageOutput {
    #[serde(flatten)]
    pub report: CoverageReport,
}

impl CommandOutput for CoverageOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = vec![format!("Coverage: {:.1}%", report.coverage_percentage)];
        if !report.covered.is_empty() {
            lines.push(format!("  Covered: {}", report.covered.join(", ")));
        }
        if !report.missing.is_empty() {
            lines.push(format!("  Missing: {}", report.missing.join(", ")));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: Tier1Args, runtime: &RegistryRuntime, json_mode: bool) -> Result<()> {
    match args.command {
        Tier1Commands::List { healthy } => {
            let sources = runtime.tier1.list(healthy).await.context("Failed to list tier1 sources")?;
            output(
                &Tier1ListOutput {
                    total: sources.len(),
                    sources,
                },
                json_mode,
            );
        }
        Tier1Commands::Coverage { interest } => {
            let report = runtime.tier1.coverage(&interest).await.context("Failed to compute coverage")?;
            output(&CoverageOutput { report }, json_mode);
        }
    }
    Ok(())
}
