//! Cleaned Table Export Module
//! Writes the cleaned dataset, derived columns included, back to CSV.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Export the cleaned table with its full derived schema.
pub fn write_cleaned_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut out = df.clone();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut out)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Cleaned table saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let df = df!(
            "name" => ["Cozy loft", "Sunny room"],
            "price" => [150.0, 80.0],
            "price_log" => [151f64.ln(), 81f64.ln()],
        )
        .unwrap();

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cleaned.csv");
        write_cleaned_csv(&df, &path).expect("export");

        let written = std::fs::read_to_string(&path).expect("read back");
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("name,price,price_log"));
        assert_eq!(written.lines().count(), 3);
        assert!(written.contains("Cozy loft"));
    }
}
