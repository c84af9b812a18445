//! Domain types for GapLab

pub mod bar;
pub mod summary;
pub mod trade;

pub use bar::{Bar, BarSeries, SeriesError};
pub use summary::Summary;
pub use trade::{SampledDay, Trade};
