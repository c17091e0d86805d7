//! Filtering capabilities for record batches
//!
//! Mask-based batch filters composed behind the `BatchFilter` trait, and
//! the segment filter built from them.

pub mod core;
pub mod date;
pub mod segment;

pub use self::core::{AndFilter, BatchFilter, CodeSetFilter, filter_record_batch};
pub use self::date::{DateRangeFilter, max_date};
pub use self::segment::{
    ALLOWED_STATUS_CODES, STATUS_ACTIVE, STATUS_INACTIVE, StatusSelection, filter_segment,
};
