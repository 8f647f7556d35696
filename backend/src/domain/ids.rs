//! Record id generation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a time-based id: `<prefix>-<epoch_millis>-<8 hex chars>`.
///
/// Example: `exp-1704880800000-9f1c2a7b`
pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, now.timestamp_millis(), &suffix[..8])
}

/// Generate an id that does not collide with any id for which `taken` is true
pub fn generate_unique_id<F>(prefix: &str, now: DateTime<Utc>, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_id(prefix, now);
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_id_format() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let id = generate_id("exp", now);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "exp");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_same_instant_ids_differ() {
        let now = Utc::now();
        let first = generate_id("exp", now);
        let second = generate_unique_id("exp", now, |candidate| candidate == first);
        assert_ne!(first, second);
    }
}
