//! Listing Cleaner Module
//! Null-fills, outlier filters, and feature engineering over the raw table.

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Malformed input: {0}")]
    Malformed(#[from] PolarsError),
}

/// Cleaning thresholds and the feature-variant toggle.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Rows above this nightly price are dropped as luxury outliers.
    pub max_price: f64,
    /// Price above which a listing is flagged expensive.
    pub expensive_threshold: f64,
    /// Rows above this minimum-stay length are dropped as long-term rentals.
    pub max_minimum_nights: i64,
    /// Derive `high_value_host` and `availability_score` columns.
    pub host_features: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            max_price: 1000.0,
            expensive_threshold: 200.0,
            max_minimum_nights: 30,
            host_features: true,
        }
    }
}

/// Applies the fixed fill/filter/derive sequence to the listings table.
pub struct ListingCleaner;

impl ListingCleaner {
    /// Clean the raw table and engineer the derived columns.
    ///
    /// Stage order is contractual: text and numeric null-fills first, then
    /// the three row filters, then categorical typing, then the derived
    /// columns over the surviving rows. Rows failing a filter are removed
    /// entirely, never clamped.
    pub fn clean(df: DataFrame, config: &CleanConfig) -> Result<DataFrame, CleanError> {
        let lf = df
            .lazy()
            .with_columns([
                col("name").fill_null(lit("No Name")),
                col("host_name").fill_null(lit("Unknown Host")),
                col("last_review").fill_null(lit("No Review")),
                col("reviews_per_month").fill_null(lit(0.0)),
            ])
            .filter(col("price").gt(lit(0.0)))
            .filter(col("price").lt_eq(lit(config.max_price)))
            .filter(col("minimum_nights").lt_eq(lit(config.max_minimum_nights)))
            .with_columns([
                col("room_type").cast(DataType::Categorical(None, CategoricalOrdering::Physical)),
                col("neighbourhood_group")
                    .cast(DataType::Categorical(None, CategoricalOrdering::Physical)),
            ])
            .with_columns([
                col("price")
                    .cast(DataType::Float64)
                    .log1p()
                    .alias("price_log"),
                col("price")
                    .gt(lit(config.expensive_threshold))
                    .cast(DataType::Int32)
                    .alias("is_expensive"),
                (col("number_of_reviews").cast(DataType::Float64) * col("reviews_per_month"))
                    .alias("review_score"),
            ]);

        let lf = if config.host_features {
            lf.with_columns([
                col("number_of_reviews")
                    .gt(lit(50))
                    .and(col("calculated_host_listings_count").gt(lit(5)))
                    .cast(DataType::Int32)
                    .alias("high_value_host"),
                (lit(1.0) - col("availability_365").cast(DataType::Float64) / lit(365.0))
                    .round(2)
                    .alias("availability_score"),
            ])
        } else {
            lf
        };

        let cleaned = lf.collect()?;
        info!("Cleaned dataset: {} rows", cleaned.height());

        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_frame() -> DataFrame {
        df!(
            "id" => [1i64, 2, 3, 4, 5, 6],
            "name" => [Some("Cozy loft"), None, None, Some("Penthouse"), Some("Bunk"), Some("Brownstone")],
            "host_name" => [Some("Ann"), Some("Alice"), None, Some("Cleo"), Some("Dan"), Some("Eve")],
            "neighbourhood_group" => ["Manhattan", "Brooklyn", "Queens", "Manhattan", "Bronx", "Brooklyn"],
            "room_type" => ["Entire home/apt", "Private room", "Private room", "Entire home/apt", "Shared room", "Entire home/apt"],
            "latitude" => [40.75, 40.68, 40.72, 40.76, 40.84, 40.69],
            "longitude" => [-73.98, -73.95, -73.90, -73.97, -73.87, -73.94],
            "price" => [150.0, 200.0, 0.0, 1001.0, 1000.0, 450.0],
            "minimum_nights" => [5i64, 5, 5, 2, 30, 40],
            "number_of_reviews" => [10i64, 0, 4, 7, 60, 12],
            "last_review" => [Some("2019-06-01"), None, None, Some("2019-05-20"), Some("2019-07-01"), Some("2019-04-11")],
            "reviews_per_month" => [Some(1.5), None, Some(0.3), Some(0.8), Some(2.0), Some(1.1)],
            "calculated_host_listings_count" => [1i64, 2, 1, 3, 6, 2],
            "availability_365" => [200i64, 0, 90, 365, 73, 120],
        )
        .unwrap()
    }

    fn clean_default(df: DataFrame) -> DataFrame {
        ListingCleaner::clean(df, &CleanConfig::default()).expect("clean")
    }

    #[test]
    fn drops_rows_outside_price_and_stay_bounds() {
        let cleaned = clean_default(raw_frame());

        // id 3 (price 0), id 4 (price 1001) and id 6 (40 nights) are dropped;
        // id 5 survives on both inclusive boundaries (price 1000, 30 nights).
        let ids: Vec<i64> = cleaned
            .column("id")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ids, vec![1, 2, 5]);

        let prices = cleaned.column("price").unwrap().f64().unwrap();
        assert!(prices.into_iter().flatten().all(|p| p > 0.0 && p <= 1000.0));

        let nights = cleaned.column("minimum_nights").unwrap().i64().unwrap();
        assert!(nights.into_iter().flatten().all(|n| n <= 30));
    }

    #[test]
    fn fills_missing_text_and_review_rate() {
        let cleaned = clean_default(raw_frame());

        let names = cleaned.column("name").unwrap().str().unwrap();
        let hosts = cleaned.column("host_name").unwrap().str().unwrap();
        let last_reviews = cleaned.column("last_review").unwrap().str().unwrap();

        // id 2 survived with name missing; no survivor keeps a null.
        assert_eq!(names.get(1), Some("No Name"));
        assert_eq!(last_reviews.get(1), Some("No Review"));
        assert_eq!(names.null_count(), 0);
        assert_eq!(hosts.null_count(), 0);
        assert_eq!(last_reviews.null_count(), 0);

        let rpm = cleaned.column("reviews_per_month").unwrap().f64().unwrap();
        assert_eq!(rpm.null_count(), 0);
        assert_eq!(rpm.get(1), Some(0.0));
    }

    #[test]
    fn marks_room_type_and_borough_categorical() {
        let cleaned = clean_default(raw_frame());

        assert!(matches!(
            cleaned.column("room_type").unwrap().dtype(),
            DataType::Categorical(_, _)
        ));
        assert!(matches!(
            cleaned.column("neighbourhood_group").unwrap().dtype(),
            DataType::Categorical(_, _)
        ));
    }

    #[test]
    fn derives_log_price_and_flags() {
        let cleaned = clean_default(raw_frame());

        let prices = cleaned.column("price").unwrap().f64().unwrap();
        let logs = cleaned.column("price_log").unwrap().f64().unwrap();
        let expensive = cleaned.column("is_expensive").unwrap().i32().unwrap();

        for i in 0..cleaned.height() {
            let price = prices.get(i).unwrap();
            let log = logs.get(i).unwrap();
            assert!((log - (1.0 + price).ln()).abs() < 1e-12);
            let expected = if price > 200.0 { 1 } else { 0 };
            assert_eq!(expensive.get(i), Some(expected));
        }

        // id 1: price 150 -> ln(151), not expensive.
        assert!((logs.get(0).unwrap() - 151f64.ln()).abs() < 1e-12);
        assert_eq!(expensive.get(0), Some(0));
        // id 2 sits exactly on the threshold: not expensive.
        assert_eq!(expensive.get(1), Some(0));
    }

    #[test]
    fn review_score_is_count_times_rate() {
        let cleaned = clean_default(raw_frame());

        let reviews = cleaned.column("number_of_reviews").unwrap().i64().unwrap();
        let rpm = cleaned.column("reviews_per_month").unwrap().f64().unwrap();
        let scores = cleaned.column("review_score").unwrap().f64().unwrap();

        for i in 0..cleaned.height() {
            let expected = reviews.get(i).unwrap() as f64 * rpm.get(i).unwrap();
            assert_eq!(scores.get(i), Some(expected));
        }

        // id 2 had a missing rate: filled to 0, so the score is exactly 0.
        assert_eq!(scores.get(1), Some(0.0));
    }

    #[test]
    fn host_features_follow_the_toggle() {
        let on = clean_default(raw_frame());
        let flags = on.column("high_value_host").unwrap().i32().unwrap();
        let scores = on.column("availability_score").unwrap().f64().unwrap();

        // id 5: 60 reviews and 6 host listings -> flagged; others not.
        assert_eq!(flags.get(2), Some(1));
        assert_eq!(flags.get(0), Some(0));

        // availability 200/365 -> 0.45, 0 -> 1.0, 73 -> 0.8
        assert_eq!(scores.get(0), Some(0.45));
        assert_eq!(scores.get(1), Some(1.0));
        assert_eq!(scores.get(2), Some(0.8));
        assert!(scores
            .into_iter()
            .flatten()
            .all(|s| (0.0..=1.0).contains(&s)));

        let off = ListingCleaner::clean(
            raw_frame(),
            &CleanConfig {
                host_features: false,
                ..CleanConfig::default()
            },
        )
        .expect("clean");
        assert!(off.column("high_value_host").is_err());
        assert!(off.column("availability_score").is_err());
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean_default(raw_frame());
        let twice = clean_default(once.clone());

        assert_eq!(once.height(), twice.height());
        assert!(once.equals(&twice));
    }

    #[test]
    fn missing_required_column_is_malformed() {
        let df = raw_frame().drop("price").unwrap();
        let result = ListingCleaner::clean(df, &CleanConfig::default());
        assert!(matches!(result, Err(CleanError::Malformed(_))));
    }
}
