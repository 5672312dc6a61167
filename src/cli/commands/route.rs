//! Routing CLI command.

use anyhow::{Context, Result};
use clap::Args;

use crate::application::RegistryRuntime;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::RoutingDecision;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Newsletter the request belongs to
    #[arg(long)]
    pub newsletter_id: i64,
    /// Requested interest (repeatable)
    #[arg(short, long, required = true)]
    pub interest: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct RouteOutput {
    pub newsletter_id: i64,
    #[serde(flatten)]
    pub decision: RoutingDecision,
}

impl CommandOutput for RouteOutput {
    fn to_human(&self) -> String {
        let sources = self.decision.sources();
        let mut lines = vec![format!(
            "Newsletter {}: {} path with {} tier1 source(s)",
            self.newsletter_id,
            self.decision.path().as_str(),
            sources.len()
        )];
        for entry in sources {
            lines.push(format!("  {:<40} {:.1}", truncate(&entry.identity.to_string(), 40), entry.quality_score));
        }
        if let RoutingDecision::Hybrid { requested_interests, .. } = &self.decision {
            lines.push(format!("On-demand discovery needed for: {}", requested_interests.join(", ")));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: RouteArgs, runtime: &RegistryRuntime, json_mode: bool) -> Result<()> {
    let decision = runtime
        .router
        .route(&args.interest, args.newsletter_id)
        .await
        .context("Failed to route request")?;

    output(
        &RouteOutput {
            newsletter_id: args.newsletter_id,
            decision,
        },
        json_mode,
    );
    Ok(())
}
