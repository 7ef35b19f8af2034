//! Market Report Module
//! Renders the templated markdown report from computed aggregates.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::stats::PriceSummary;

/// Writes the markdown market report.
pub struct ReportWriter;

impl ReportWriter {
    /// Render and write the report for a cleaned dataset.
    pub fn write(summary: &PriceSummary, path: &Path) -> Result<()> {
        let report = Self::render(summary);
        fs::write(path, report).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report saved: {}", path.display());
        Ok(())
    }

    /// Render the report body. Every figure is computed from the data.
    pub fn render(summary: &PriceSummary) -> String {
        let mut report = String::new();

        report.push_str("# NYC Airbnb Market Report (2019)\n\n");
        report.push_str(&format!(
            "**Total Listings**: {}\n",
            Self::group_thousands(summary.total_listings)
        ));
        report.push_str(&format!(
            "**Average Price**: ${:.2}/night\n",
            summary.overall.mean
        ));

        if summary.by_group.len() >= 2 {
            let first = &summary.by_group[0];
            let second = &summary.by_group[1];
            report.push_str(&format!(
                "**{} Avg**: ${:.0} | **{} Avg**: ${:.0}\n",
                first.group_name, first.mean, second.group_name, second.mean
            ));
        }
        report.push('\n');

        report.push_str("## Price by Neighbourhood Group\n\n");
        report.push_str(
            "| Neighbourhood Group | Listings | Mean | Median | Std | P95 | P05 | P-value |\n",
        );
        report.push_str("|---|---|---|---|---|---|---|---|\n");
        for gs in &summary.by_group {
            let p_value = match gs.p_value {
                Some(p) if gs.is_significant => format!("{:.4} *", p),
                Some(p) => format!("{:.4}", p),
                None => "-".to_string(),
            };
            report.push_str(&format!(
                "| {} | {} | ${:.2} | ${:.2} | {:.2} | ${:.2} | ${:.2} | {} |\n",
                gs.group_name,
                Self::group_thousands(gs.count),
                gs.mean,
                gs.median,
                gs.std,
                gs.p95,
                gs.p05,
                p_value,
            ));
        }
        report.push_str(&format!(
            "\n\\* price level differs significantly from {} (Welch's t-test, p <= 0.05)\n\n",
            summary.baseline_group
        ));

        report.push_str("## Key Insights\n");
        for insight in Self::insights(summary) {
            report.push_str(&format!("- {}\n", insight));
        }
        report.push('\n');

        report.push_str("## Mean Price by Room Type\n");
        for (room_type, mean) in &summary.room_type_means {
            report.push_str(&format!("- **{}**: ${:.2}/night\n", room_type, mean));
        }

        report
    }

    /// Insight lines, all derived from the summary rather than hardcoded.
    fn insights(summary: &PriceSummary) -> Vec<String> {
        let mut insights = Vec::new();

        if let Some(top) = summary.by_group.first() {
            let share = top.count as f64 / summary.total_listings.max(1) as f64 * 100.0;
            insights.push(format!(
                "**{}** has {} listings ({:.0}% of the market)",
                top.group_name,
                Self::group_thousands(top.count),
                share
            ));
        }

        if let (Some((priciest, priciest_mean)), Some((cheapest, cheapest_mean))) = (
            summary.room_type_means.first(),
            summary.room_type_means.last(),
        ) {
            if priciest != cheapest && *cheapest_mean > 0.0 {
                insights.push(format!(
                    "**{}** listings average {:.1}x the price of {}",
                    priciest,
                    priciest_mean / cheapest_mean,
                    cheapest.to_lowercase()
                ));
            }
        }

        if summary.by_group.len() >= 2 {
            let first = &summary.by_group[0];
            let second = &summary.by_group[1];
            if first.mean > 0.0 && second.mean < first.mean {
                insights.push(format!(
                    "**{}** averages {:.0}% less than {}",
                    second.group_name,
                    (1.0 - second.mean / first.mean) * 100.0,
                    first.group_name
                ));
            }
        }

        let significant: Vec<&str> = summary
            .by_group
            .iter()
            .filter(|gs| gs.is_significant)
            .map(|gs| gs.group_name.as_str())
            .collect();
        if !significant.is_empty() {
            insights.push(format!(
                "Price levels in {} differ significantly from {}",
                significant.join(", "),
                summary.baseline_group
            ));
        }

        insights
    }

    fn group_thousands(n: usize) -> String {
        let digits = n.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}
