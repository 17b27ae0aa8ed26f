//! Readers for TE annotation and region-of-interest files.

pub mod roi;
pub mod te;
pub mod util;

pub use roi::{collect_roi_intervals, RoiIntervals, RoiReader};
pub use te::TeReader;
