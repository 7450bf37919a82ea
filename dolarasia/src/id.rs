//! Opaque ids for stored records.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use time::OffsetDateTime;

/// Millisecond timestamp prefix keeps ids roughly sortable by creation time,
/// the random suffix keeps them unique within one millisecond.
pub fn opaque_id() -> String {
    let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64;
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{millis:x}-{}", suffix.to_lowercase())
}
