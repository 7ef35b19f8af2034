//! Chart Style Module
//! Figure geometry and colors, passed explicitly to the renderer.

use plotters::style::RGBColor;

/// Accent color for single-series charts
pub const ACCENT: RGBColor = RGBColor(52, 152, 219); // Blue

/// Color palette for multi-series charts
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(46, 204, 113), // Green
    RGBColor(155, 89, 182), // Purple
    RGBColor(243, 156, 18), // Orange
    RGBColor(26, 188, 156), // Teal
    RGBColor(233, 30, 99),  // Pink
    RGBColor(0, 188, 212),  // Cyan
    RGBColor(255, 87, 34),  // Deep Orange
    RGBColor(121, 85, 72),  // Brown
    RGBColor(96, 125, 139), // Blue Grey
];

/// Rendering parameters shared by all five charts.
///
/// One value of this struct is built at startup and handed to every render
/// call; nothing styling-related lives in process-global state.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// Histogram bin count over `[0, histogram_max_price]`.
    pub histogram_bins: usize,
    pub histogram_max_price: f64,
    /// Row count of the deterministic scatter sample.
    pub scatter_sample: usize,
    pub sample_seed: u64,
    pub accent: RGBColor,
    pub palette: [RGBColor; 10],
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            histogram_bins: 50,
            histogram_max_price: 600.0,
            scatter_sample: 1000,
            sample_seed: 42,
            accent: ACCENT,
            palette: PALETTE,
        }
    }
}

impl ChartStyle {
    /// Series color for a group index.
    pub fn series_color(&self, index: usize) -> RGBColor {
        self.palette[index % self.palette.len()]
    }
}
