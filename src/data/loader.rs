//! CSV Listing Loader Module
//! Reads the raw Airbnb listings CSV into a DataFrame using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("{} not found! Download the NYC Airbnb Open Data CSV from Kaggle and place it in the working directory", .path.display())]
    MissingInput { path: PathBuf },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Loads the listings file with Polars.
pub struct ListingLoader;

impl ListingLoader {
    /// Columns whose dtype is pinned at read time.
    ///
    /// A value in one of these columns that does not parse under the pinned
    /// dtype fails the whole read. Without the pin the reader would demote
    /// the column to strings and the failure would only surface downstream.
    fn numeric_schema() -> Schema {
        Schema::from_iter([
            Field::new("latitude".into(), DataType::Float64),
            Field::new("longitude".into(), DataType::Float64),
            Field::new("price".into(), DataType::Float64),
            Field::new("minimum_nights".into(), DataType::Int64),
            Field::new("number_of_reviews".into(), DataType::Int64),
            Field::new("reviews_per_month".into(), DataType::Float64),
            Field::new("calculated_host_listings_count".into(), DataType::Int64),
            Field::new("availability_365".into(), DataType::Int64),
        ])
    }

    /// Load the listings CSV, failing fast when the file is absent.
    pub fn load(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_dtype_overwrite(Some(Arc::new(Self::numeric_schema())))
            .finish()?
            .collect()?;

        info!(
            "Loaded {} listings with {} features",
            df.height(),
            df.width()
        );

        Ok(df)
    }
}
