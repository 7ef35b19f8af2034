//! Run Configuration Module
//! Fixed input/output locations and stage settings for a batch run.

use std::path::PathBuf;

use crate::charts::ChartStyle;
use crate::data::CleanConfig;

/// Output locations for the five static charts.
#[derive(Debug, Clone)]
pub struct ChartPaths {
    pub price_distribution: PathBuf,
    pub price_by_room_type: PathBuf,
    pub listings_by_neighbourhood: PathBuf,
    pub reviews_vs_price: PathBuf,
    pub top_reviewed: PathBuf,
}

impl Default for ChartPaths {
    fn default() -> Self {
        Self {
            price_distribution: PathBuf::from("plot_price_distribution.png"),
            price_by_room_type: PathBuf::from("plot_price_by_roomtype.png"),
            listings_by_neighbourhood: PathBuf::from("plot_listings_by_neighbourhood.png"),
            reviews_vs_price: PathBuf::from("plot_reviews_vs_price.png"),
            top_reviewed: PathBuf::from("plot_top10_reviewed.png"),
        }
    }
}

/// Full configuration for one run.
///
/// The binary takes no arguments; `Default` reproduces the fixed relative
/// paths the analysis has always used. Styling is carried here as a plain
/// value and handed to the renderer explicitly instead of living in global
/// state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub cleaned_csv_path: PathBuf,
    pub report_path: PathBuf,
    pub map_path: PathBuf,
    pub charts: ChartPaths,
    pub cleaning: CleanConfig,
    pub style: ChartStyle,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("AB_NYC_2019.csv"),
            cleaned_csv_path: PathBuf::from("airbnb_cleaned.csv"),
            report_path: PathBuf::from("AIRBNB_REPORT.md"),
            map_path: PathBuf::from("nyc_high_value_hosts_map.html"),
            charts: ChartPaths::default(),
            cleaning: CleanConfig::default(),
            style: ChartStyle::default(),
        }
    }
}
