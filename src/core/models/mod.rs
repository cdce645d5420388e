//! Data models for the course catalog

pub mod course;
pub mod pricing;
pub mod raw;
pub mod status;

pub use course::{parse_weeks, split_tools, Course, DurationBucket, Level};
pub use pricing::{PriceTier, Pricing};
pub use raw::RawCourse;
pub use status::Status;
