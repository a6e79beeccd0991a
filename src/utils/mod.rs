//! Utility functions and helpers

pub mod time;

pub use time::{current_time_info, current_timestamp};
