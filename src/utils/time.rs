//! Time and timestamp utilities

use chrono::{Datelike, SecondsFormat, Timelike, Utc};
use serde_json::{json, Value};

/// Current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Current time information as JSON
pub fn current_time_info() -> Value {
    let now = Utc::now();

    json!({
        "timestamp": now.timestamp(),
        "timestamp_ms": now.timestamp_millis(),
        "iso8601": now.to_rfc3339_opts(SecondsFormat::Secs, true),
        "readable": now.format("%A, %-d %B %Y %H:%M:%S UTC").to_string(),
        "components": {
            "year": now.year(),
            "month": now.month(),
            "day": now.day(),
            "hour": now.hour(),
            "minute": now.minute(),
            "second": now.second(),
            "weekday": now.format("%A").to_string()
        }
    })
}
