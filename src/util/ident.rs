//! Identity helpers: UUIDs and epoch-millisecond timestamps

use chrono::Utc;
use uuid::Uuid;

/// A fresh v4 UUID.
pub fn new_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Current time in milliseconds since the Unix epoch.
pub fn timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
