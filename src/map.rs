//! Host Map Module
//! Writes a self-contained Leaflet document with one marker per sampled
//! high-value host listing.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::stats::StatsCalculator;

/// Map center: lower Manhattan
const NYC_CENTER: (f64, f64) = (40.7128, -74.0060);
const ZOOM: u32 = 11;
/// At most this many markers end up on the map.
const MAX_MARKERS: usize = 500;
const SAMPLE_SEED: u64 = 42;

/// Generates the interactive high-value-host map.
pub struct HostMapBuilder;

impl HostMapBuilder {
    /// Write the map document for the flagged hosts in the cleaned table.
    pub fn write(df: &DataFrame, path: &Path) -> Result<()> {
        let flagged = df
            .clone()
            .lazy()
            .filter(col("high_value_host").eq(lit(1)))
            .collect()?;

        let take = MAX_MARKERS.min(flagged.height());
        let sample = flagged.sample_n_literal(take, false, false, Some(SAMPLE_SEED))?;

        let html = Self::render(&sample)?;
        fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Map saved: {} ({} markers)", path.display(), take);
        Ok(())
    }

    /// Render the document for the given (already sampled) rows.
    fn render(sample: &DataFrame) -> Result<String> {
        let names = sample.column("name")?.cast(&DataType::String)?;
        let names = names.str()?;
        let hosts = sample.column("host_name")?.cast(&DataType::String)?;
        let hosts = hosts.str()?;
        let lats = StatsCalculator::column_values(sample, "latitude")?;
        let lngs = StatsCalculator::column_values(sample, "longitude")?;
        let prices = StatsCalculator::column_values(sample, "price")?;
        let reviews = StatsCalculator::column_values(sample, "number_of_reviews")?;

        let mut markers = String::new();
        for i in 0..sample.height() {
            let (Some(name), Some(host)) = (names.get(i), hosts.get(i)) else {
                continue;
            };
            let (Some(&lat), Some(&lng)) = (lats.get(i), lngs.get(i)) else {
                continue;
            };
            let price = prices.get(i).copied().unwrap_or(0.0);
            let review_count = reviews.get(i).copied().unwrap_or(0.0) as i64;

            let popup = format!(
                "<b>{}</b><br>Price: ${:.0}<br>Reviews: {}<br>Host: {}",
                Self::escape_html(name),
                price,
                review_count,
                Self::escape_html(host),
            );
            markers.push_str(&format!(
                "    L.circleMarker([{:.5}, {:.5}], {{radius: 6, color: 'red', fill: true, fillOpacity: 0.8}}).bindPopup(\"{}\").addTo(map);\n",
                lat,
                lng,
                Self::escape_js(&popup),
            ));
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>NYC Airbnb High-Value Hosts</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
  <div id="map"></div>
  <script>
    var map = L.map('map').setView([{lat:.4}, {lng:.4}], {zoom});
    L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
      attribution: '&copy; OpenStreetMap contributors'
    }}).addTo(map);
{markers}  </script>
</body>
</html>
"#,
            lat = NYC_CENTER.0,
            lng = NYC_CENTER.1,
            zoom = ZOOM,
            markers = markers,
        ))
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    fn escape_js(text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', " ")
            .replace('\r', " ")
    }
}
