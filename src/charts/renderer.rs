//! Static Chart Renderer
//! Draws the five analysis PNGs with plotters' bitmap backend.

use anyhow::{Context, Result};
use plotters::prelude::*;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::charts::ChartStyle;
use crate::config::ChartPaths;
use crate::stats::StatsCalculator;

/// Renders the static chart set from the cleaned table.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Render all five charts to their configured paths.
    pub fn render_all(df: &DataFrame, style: &ChartStyle, paths: &ChartPaths) -> Result<()> {
        Self::price_histogram(df, style, &paths.price_distribution)?;
        Self::price_by_room_type(df, style, &paths.price_by_room_type)?;
        Self::listings_by_neighbourhood(df, style, &paths.listings_by_neighbourhood)?;
        Self::reviews_vs_price(df, style, &paths.reviews_vs_price)?;
        Self::top_reviewed(df, style, &paths.top_reviewed, 10)?;
        info!("Generated 5 visualizations");
        Ok(())
    }

    /// Fixed-bin price histogram over `[0, histogram_max_price]`.
    pub fn price_histogram(df: &DataFrame, style: &ChartStyle, path: &Path) -> Result<()> {
        let prices = StatsCalculator::column_values(df, "price")?;

        let bins = style.histogram_bins.max(1);
        let bin_width = style.histogram_max_price / bins as f64;
        let mut counts = vec![0u32; bins];
        for price in &prices {
            if *price >= 0.0 && *price <= style.histogram_max_price {
                let idx = ((price / bin_width) as usize).min(bins - 1);
                counts[idx] += 1;
            }
        }
        let y_max = (counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1).ceil() as u32;

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("NYC Airbnb Price Distribution (2019)", ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..style.histogram_max_price, 0u32..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Price per Night ($)")
            .y_desc("Listings")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = i as f64 * bin_width;
            Rectangle::new([(x0, 0), (x0 + bin_width, count)], style.accent.filled())
        }))?;

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Price box plot per room type on a log-scale y-axis.
    pub fn price_by_room_type(df: &DataFrame, style: &ChartStyle, path: &Path) -> Result<()> {
        let room_types = StatsCalculator::unique_labels(df, "room_type");
        let groups: Vec<(String, Vec<f64>)> = room_types
            .into_iter()
            .map(|rt| {
                let values = StatsCalculator::values_for_group(df, "room_type", &rt);
                (rt, values)
            })
            .filter(|(_, values)| !values.is_empty())
            .collect();

        let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
        let (y_min, y_max) = Self::log_bounds(&all);

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = groups.len().max(1);
        let mut chart = ChartBuilder::on(&root)
            .caption("Price by Room Type", ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (y_min..y_max).log_scale())?;

        let labels: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
        chart
            .configure_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let idx = x.round() as usize;
                labels.get(idx).cloned().unwrap_or_default()
            })
            .x_desc("Room Type")
            .y_desc("Price (Log Scale)")
            .draw()?;

        for (i, (_, values)) in groups.iter().enumerate() {
            let color = style.series_color(i);
            let cx = i as f64;

            let mut sorted = values.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let len = sorted.len();
            let q1 = sorted[len / 4];
            let median = sorted[len / 2];
            let q3 = sorted[3 * len / 4];
            let iqr = q3 - q1;
            let low = *sorted
                .iter()
                .find(|&&v| v >= q1 - 1.5 * iqr)
                .unwrap_or(&q1);
            let high = *sorted
                .iter()
                .rev()
                .find(|&&v| v <= q3 + 1.5 * iqr)
                .unwrap_or(&q3);

            // Box with median line
            chart.draw_series(std::iter::once(Rectangle::new(
                [(cx - 0.25, q1), (cx + 0.25, q3)],
                color.mix(0.3).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(cx - 0.25, q1), (cx + 0.25, q3)],
                color.stroke_width(2),
            )))?;
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(cx - 0.25, median), (cx + 0.25, median)],
                color.stroke_width(2),
            )))?;

            // Whiskers with caps
            for (a, b) in [(low, q1), (q3, high)] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(cx, a), (cx, b)],
                    color.stroke_width(1),
                )))?;
            }
            for cap in [low, high] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(cx - 0.1, cap), (cx + 0.1, cap)],
                    color.stroke_width(1),
                )))?;
            }
        }

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Listing counts per neighbourhood group, largest first.
    pub fn listings_by_neighbourhood(df: &DataFrame, style: &ChartStyle, path: &Path) -> Result<()> {
        let mut counts: Vec<(String, usize)> =
            StatsCalculator::unique_labels(df, "neighbourhood_group")
                .into_iter()
                .map(|group| {
                    let n =
                        StatsCalculator::values_for_group(df, "neighbourhood_group", &group).len();
                    (group, n)
                })
                .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let y_max = (counts.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1) as f64 * 1.1).ceil();

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = counts.len().max(1);
        let mut chart = ChartBuilder::on(&root)
            .caption("Listings by Neighbourhood Group", ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        let labels: Vec<String> = counts.iter().map(|(name, _)| name.clone()).collect();
        chart
            .configure_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let idx = x.round() as usize;
                labels.get(idx).cloned().unwrap_or_default()
            })
            .x_desc("Neighbourhood Group")
            .y_desc("Count")
            .draw()?;

        for (i, (_, count)) in counts.iter().enumerate() {
            let color = style.series_color(i);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *count as f64)],
                color.filled(),
            )))?;
        }

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Review count vs price on a deterministic sample, colored by room type.
    pub fn reviews_vs_price(df: &DataFrame, style: &ChartStyle, path: &Path) -> Result<()> {
        let take = style.scatter_sample.min(df.height());
        let sample = df.sample_n_literal(take, false, false, Some(style.sample_seed))?;

        let reviews = StatsCalculator::column_values(&sample, "number_of_reviews")?;
        let prices = StatsCalculator::column_values(&sample, "price")?;
        let rooms = sample.column("room_type")?.cast(&DataType::String)?;
        let rooms = rooms.str()?;

        let mut by_room: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
        for i in 0..sample.height() {
            if let (Some(room), Some(&x), Some(&y)) = (rooms.get(i), reviews.get(i), prices.get(i))
            {
                by_room.entry(room.to_string()).or_default().push((x, y));
            }
        }

        let x_max = reviews.iter().copied().fold(1.0f64, f64::max) * 1.05;
        let (y_min, y_max) = Self::log_bounds(&prices);

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Reviews vs Price (Sample of {})", take),
                ("sans-serif", 28),
            )
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, (y_min..y_max).log_scale())?;

        chart
            .configure_mesh()
            .x_desc("Number of Reviews")
            .y_desc("Price (Log Scale)")
            .draw()?;

        let mut room_types: Vec<&String> = by_room.keys().collect();
        room_types.sort();

        for (i, room) in room_types.into_iter().enumerate() {
            let color = style.series_color(i);
            let points = &by_room[room];
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.7).filled())),
                )?
                .label(room.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Horizontal bars for the most-reviewed listings.
    pub fn top_reviewed(df: &DataFrame, style: &ChartStyle, path: &Path, n: usize) -> Result<()> {
        let top = df
            .clone()
            .lazy()
            .select([
                col("name").cast(DataType::String),
                col("number_of_reviews"),
            ])
            .sort(
                ["number_of_reviews"],
                SortMultipleOptions::default().with_order_descending(true),
            )
            .limit(n as u32)
            .collect()?;

        let names = top.column("name")?.str()?.clone();
        let reviews = StatsCalculator::column_values(&top, "number_of_reviews")?;
        let rows = reviews.len();

        // Most-reviewed listing at the top of the chart.
        let labels: Vec<String> = (0..rows)
            .map(|pos| {
                let i = rows - 1 - pos;
                Self::truncate(names.get(i).unwrap_or(""), 40)
            })
            .collect();

        let x_max = reviews.iter().copied().fold(1.0f64, f64::max) * 1.1;

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Top {} Most Reviewed Listings", rows),
                ("sans-serif", 28),
            )
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(280)
            .build_cartesian_2d(0f64..x_max, -0.5f64..(rows.max(1) as f64 - 0.5))?;

        chart
            .configure_mesh()
            .y_labels(rows.max(1))
            .y_label_formatter(&|y| {
                let pos = y.round() as usize;
                labels.get(pos).cloned().unwrap_or_default()
            })
            .x_desc("Number of Reviews")
            .draw()?;

        for (i, &count) in reviews.iter().enumerate() {
            let pos = (rows - 1 - i) as f64;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(0.0, pos - 0.35), (count, pos + 0.35)],
                style.series_color(i).filled(),
            )))?;
        }

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Positive y-bounds with padding, as a log axis requires.
    fn log_bounds(values: &[f64]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            if v > 0.0 {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if !min.is_finite() {
            return (1.0, 10.0);
        }
        ((min * 0.9).max(0.5), max * 1.1)
    }

    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", head)
        }
    }
}
