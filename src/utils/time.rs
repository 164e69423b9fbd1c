use chrono::Utc;

/// Milliseconds since the Unix epoch, as Binance expects in `timestamp`.
pub fn timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}
