//! Background music preference
//!
//! Persisted separately from the game state and prize list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_BGM_VOLUME;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmPreference {
    pub enabled: bool,
    /// 0.0 - 1.0
    pub volume: f32,
    pub updated_at: DateTime<Utc>,
}

impl BgmPreference {
    /// Music on at the default volume
    pub fn default_at(now: DateTime<Utc>) -> Self {
        Self {
            enabled: true,
            volume: DEFAULT_BGM_VOLUME,
            updated_at: now,
        }
    }

    /// Copy with a new volume, clamped to 0-1 (NaN resets to default)
    pub fn with_volume(&self, volume: f32, now: DateTime<Utc>) -> Self {
        let volume = if volume.is_nan() {
            DEFAULT_BGM_VOLUME
        } else {
            volume.clamp(0.0, 1.0)
        };
        Self {
            volume,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn with_enabled(&self, enabled: bool, now: DateTime<Utc>) -> Self {
        Self {
            enabled,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Volume to actually play at
    pub fn effective_volume(&self) -> f32 {
        if self.enabled { self.volume } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_volume_is_clamped() {
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let t1 = Utc.timestamp_opt(1, 0).unwrap();
        let pref = BgmPreference::default_at(t0);
        assert_eq!(pref.with_volume(1.7, t1).volume, 1.0);
        assert_eq!(pref.with_volume(-0.2, t1).volume, 0.0);
        assert_eq!(pref.with_volume(f32::NAN, t1).volume, DEFAULT_BGM_VOLUME);
        assert_eq!(pref.with_volume(0.3, t1).updated_at, t1);
    }

    #[test]
    fn test_effective_volume_respects_enabled() {
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let pref = BgmPreference::default_at(t0);
        assert_eq!(pref.effective_volume(), DEFAULT_BGM_VOLUME);
        assert_eq!(pref.with_enabled(false, t0).effective_volume(), 0.0);
    }
}
