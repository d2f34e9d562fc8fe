//! Serde helper for the one non-`Serialize`-by-default field a pipeline
//! config carries: `std::time::Duration`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializes a `Duration` as whole seconds, used by
/// [`crate::monitoring::MonitoringConfig::snapshot_interval`] via
/// `#[serde(with = "duration_serde")]`.
pub mod duration_serde {
    use super::*;

    /// Serializes Duration as seconds (u64).
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    /// Deserializes Duration from seconds (u64).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
