//! Metrics CLI command.

use anyhow::{Context, Result};

use crate::application::RegistryRuntime;
use crate::cli::output::{format_counts, output, CommandOutput};
use crate::services::RegistryMetrics;

#[derive(Debug, serde::Serialize)]
pub struct MetricsOutput {
    #[serde(flatten)]
    pub metrics: RegistryMetrics,
}

impl CommandOutput for MetricsOutput {
    fn to_human(&self) -> String {
        let m = &self.metrics;
        let mut lines = vec![
            "Tier1".to_string(),
            format!("  total: {}  healthy: {}  avg score: {:.2}", m.tier1.total, m.tier1.healthy, m.tier1.avg_quality_score),
        ];
        lines.extend(format_counts(&m.tier1.by_type));

        lines.push("Blacklist".to_string());
        lines.push(format!("  total: {}", m.blacklist.total));
        lines.extend(format_counts(&m.blacklist.by_reason));

        lines.push("Discovery ledger".to_string());
        lines.push(format!(
            "  total: {}  promoted: {} ({:.1}%)",
            m.ledger.total, m.ledger.promoted, m.ledger.promotion_rate
        ));
        lines.extend(format_counts(&m.ledger.by_method));
        lines.join("\n")
    }
}

pub async fn execute(runtime: &RegistryRuntime, json_mode: bool) -> Result<()> {
    let metrics = runtime.metrics.snapshot().await.context("Failed to collect metrics")?;
    output(&MetricsOutput { metrics }, json_mode);
    Ok(())
}
