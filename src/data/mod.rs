//! Data module - CSV loading, cleaning, and export

mod cleaner;
mod export;
mod loader;

pub use cleaner::{CleanConfig, CleanError, ListingCleaner};
pub use export::write_cleaned_csv;
pub use loader::{ListingLoader, LoaderError};
