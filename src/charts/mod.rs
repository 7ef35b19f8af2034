//! Charts module - Static chart rendering

mod renderer;
mod style;

pub use renderer::ChartRenderer;
pub use style::{ChartStyle, ACCENT, PALETTE};
