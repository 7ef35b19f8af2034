//! Stats module - Aggregate statistics for the market report

mod calculator;

pub use calculator::{GroupStats, PriceSummary, StatsCalculator, SIGNIFICANCE_THRESHOLD};
