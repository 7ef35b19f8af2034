//! Statistics Calculator Module
//! Descriptive price statistics per borough and room type, with Welch's t-test
//! against the baseline borough.

use anyhow::{anyhow, Result};
use polars::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Price statistics for one group of listings.
#[derive(Debug, Clone)]
pub struct GroupStats {
    pub group_name: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub p95: f64,
    pub p05: f64,
    /// Two-tailed Welch p-value against the baseline borough.
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

impl Default for GroupStats {
    fn default() -> Self {
        Self {
            group_name: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            p95: f64::NAN,
            p05: f64::NAN,
            p_value: None,
            is_significant: false,
        }
    }
}

/// Aggregate price statistics over the cleaned table.
#[derive(Debug, Clone)]
pub struct PriceSummary {
    pub total_listings: usize,
    pub overall: GroupStats,
    /// Borough with the most listings; other boroughs are tested against it.
    pub baseline_group: String,
    /// Per-borough stats, baseline first, then descending listing count.
    pub by_group: Vec<GroupStats>,
    /// Mean nightly price per room type, descending.
    pub room_type_means: Vec<(String, f64)>,
}

impl PriceSummary {
    /// Compute the summary the report is rendered from.
    pub fn compute(df: &DataFrame) -> Result<PriceSummary> {
        let all_prices = StatsCalculator::column_values(df, "price")?;
        if all_prices.is_empty() {
            return Err(anyhow!("No listings survived cleaning"));
        }

        let mut overall = StatsCalculator::compute_descriptive_stats(&all_prices);
        overall.group_name = "All listings".to_string();

        let mut by_group: Vec<GroupStats> =
            StatsCalculator::unique_labels(df, "neighbourhood_group")
                .into_iter()
                .map(|group| {
                    let values =
                        StatsCalculator::values_for_group(df, "neighbourhood_group", &group);
                    let mut stats = StatsCalculator::compute_descriptive_stats(&values);
                    stats.group_name = group;
                    stats
                })
                .collect();
        by_group.sort_by(|a, b| b.count.cmp(&a.count).then(a.group_name.cmp(&b.group_name)));

        let baseline_group = by_group
            .first()
            .map(|gs| gs.group_name.clone())
            .ok_or_else(|| anyhow!("No neighbourhood groups present"))?;
        let baseline_values =
            StatsCalculator::values_for_group(df, "neighbourhood_group", &baseline_group);

        for stats in by_group.iter_mut().skip(1) {
            let values =
                StatsCalculator::values_for_group(df, "neighbourhood_group", &stats.group_name);
            let (p_value, is_significant) =
                StatsCalculator::perform_ttest(&values, &baseline_values);
            stats.p_value = Some(p_value);
            stats.is_significant = is_significant;
        }

        let mut room_type_means: Vec<(String, f64)> =
            StatsCalculator::unique_labels(df, "room_type")
                .into_iter()
                .map(|room_type| {
                    let values = StatsCalculator::values_for_group(df, "room_type", &room_type);
                    let mean = if values.is_empty() {
                        f64::NAN
                    } else {
                        values.iter().sum::<f64>() / values.len() as f64
                    };
                    (room_type, mean)
                })
                .collect();
        room_type_means
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(PriceSummary {
            total_listings: df.height(),
            overall,
            baseline_group,
            by_group,
            room_type_means,
        })
    }

    /// Stats for a borough by name.
    pub fn group(&self, name: &str) -> Option<&GroupStats> {
        self.by_group.iter().find(|gs| gs.group_name == name)
    }
}

/// Handles the statistical calculations behind the market report.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> GroupStats {
        let n = values.len();
        if n == 0 {
            return GroupStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        GroupStats {
            group_name: String::new(),
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            p95: Self::percentile(&sorted, 95.0),
            p05: Self::percentile(&sorted, 5.0),
            p_value: None,
            is_significant: false,
        }
    }

    /// Calculate percentile using linear interpolation.
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Perform Welch's t-test (independent samples, unequal variance).
    pub fn perform_ttest(group_values: &[f64], baseline_values: &[f64]) -> (f64, bool) {
        let n1 = group_values.len() as f64;
        let n2 = baseline_values.len() as f64;

        if n1 < 2.0 || n2 < 2.0 {
            return (f64::NAN, false);
        }

        let mean1 = group_values.iter().sum::<f64>() / n1;
        let mean2 = baseline_values.iter().sum::<f64>() / n2;

        let var1 = group_values
            .iter()
            .map(|x| (x - mean1).powi(2))
            .sum::<f64>()
            / (n1 - 1.0);
        let var2 = baseline_values
            .iter()
            .map(|x| (x - mean2).powi(2))
            .sum::<f64>()
            / (n2 - 1.0);

        let se = (var1 / n1 + var2 / n2).sqrt();
        if se == 0.0 {
            return (1.0, false);
        }

        let t = (mean1 - mean2) / se;

        // Welch-Satterthwaite degrees of freedom
        let df_num = (var1 / n1 + var2 / n2).powi(2);
        let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
        let df = df_num / df_denom;

        if let Ok(dist) = StudentsT::new(0.0, 1.0, df) {
            let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
            (p_value, p_value <= SIGNIFICANCE_THRESHOLD)
        } else {
            (f64::NAN, false)
        }
    }

    /// Get the distinct labels of a text or categorical column.
    pub fn unique_labels(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.cast(&DataType::String).ok())
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut labels: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                labels.sort();
                labels
            })
            .unwrap_or_default()
    }

    /// Get price values for the rows matching one label of a group column.
    pub fn values_for_group(df: &DataFrame, group_col: &str, group: &str) -> Vec<f64> {
        df.clone()
            .lazy()
            .filter(col(group_col).cast(DataType::String).eq(lit(group)))
            .select([col("price").cast(DataType::Float64)])
            .collect()
            .ok()
            .and_then(|df| df.column("price").ok().cloned())
            .map(|col| {
                col.f64()
                    .map(|ca| ca.into_iter().flatten().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Get a whole numeric column as f64 values, nulls skipped.
    pub fn column_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
        let col = df.column(column)?.cast(&DataType::Float64)?;
        Ok(col
            .f64()
            .map(|ca| ca.into_iter().flatten().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listings() -> DataFrame {
        df!(
            "neighbourhood_group" => ["Manhattan", "Manhattan", "Manhattan", "Brooklyn", "Brooklyn", "Queens"],
            "room_type" => ["Entire home/apt", "Entire home/apt", "Private room", "Private room", "Shared room", "Private room"],
            "price" => [200.0, 250.0, 150.0, 90.0, 60.0, 80.0],
        )
        .unwrap()
    }

    #[test]
    fn descriptive_stats_on_known_values() {
        let stats = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert!((stats.std - 2.5f64.sqrt()).abs() < 1e-12);
        assert!((stats.p95 - 4.8).abs() < 1e-12);
        assert!((stats.p05 - 1.2).abs() < 1e-12);
    }

    #[test]
    fn median_of_even_sample_interpolates() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn ttest_separates_distant_samples() {
        let near: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let far: Vec<f64> = (0..30).map(|i| 200.0 + (i % 5) as f64).collect();

        let (p_same, sig_same) = StatsCalculator::perform_ttest(&near, &near.clone());
        assert!(p_same > 0.99);
        assert!(!sig_same);

        let (p_far, sig_far) = StatsCalculator::perform_ttest(&near, &far);
        assert!(p_far < SIGNIFICANCE_THRESHOLD);
        assert!(sig_far);
    }

    #[test]
    fn ttest_requires_two_values_per_sample() {
        let (p, sig) = StatsCalculator::perform_ttest(&[1.0], &[1.0, 2.0]);
        assert!(p.is_nan());
        assert!(!sig);
    }

    #[test]
    fn summary_orders_boroughs_by_listing_count() {
        let summary = PriceSummary::compute(&listings()).expect("summary");

        assert_eq!(summary.total_listings, 6);
        assert_eq!(summary.baseline_group, "Manhattan");
        let order: Vec<&str> = summary
            .by_group
            .iter()
            .map(|gs| gs.group_name.as_str())
            .collect();
        assert_eq!(order, vec!["Manhattan", "Brooklyn", "Queens"]);

        let manhattan = summary.group("Manhattan").unwrap();
        assert_eq!(manhattan.count, 3);
        assert_eq!(manhattan.mean, 200.0);
        assert!(manhattan.p_value.is_none());
        assert!(summary.group("Brooklyn").unwrap().p_value.is_some());
    }

    #[test]
    fn summary_ranks_room_types_by_mean_price() {
        let summary = PriceSummary::compute(&listings()).expect("summary");

        let names: Vec<&str> = summary
            .room_type_means
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["Entire home/apt", "Private room", "Shared room"]);

        let (_, entire_mean) = &summary.room_type_means[0];
        assert_eq!(*entire_mean, 225.0);
    }

    #[test]
    fn overall_mean_covers_every_listing() {
        let summary = PriceSummary::compute(&listings()).expect("summary");
        let expected = (200.0 + 250.0 + 150.0 + 90.0 + 60.0 + 80.0) / 6.0;
        assert!((summary.overall.mean - expected).abs() < 1e-12);
    }
}
