//! Engine tunables
//!
//! Deserializable so the server can load them from its `[playback]` section.

use cadence_core::{CadenceError, Result};
use serde::{Deserialize, Serialize};

/// Playback engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Volume for a first `start` that supplies none
    #[serde(default = "default_volume_percent")]
    pub default_volume_percent: u8,

    /// Device name for a first `start` that supplies none
    #[serde(default = "default_device_name")]
    pub default_device_name: String,

    /// Listen duration recorded for tracks reached through next/previous
    #[serde(default = "default_skip_listen_seconds")]
    pub skip_listen_seconds: f64,

    #[serde(default)]
    pub play_count: PlayCountPolicy,

    #[serde(default = "default_queue_list_limit")]
    pub queue_list_default_limit: i64,

    #[serde(default = "default_queue_list_max_limit")]
    pub queue_list_max_limit: i64,
}

fn default_volume_percent() -> u8 {
    80
}

fn default_device_name() -> String {
    "Web Player".to_string()
}

fn default_skip_listen_seconds() -> f64 {
    30.0
}

fn default_queue_list_limit() -> i64 {
    50
}

fn default_queue_list_max_limit() -> i64 {
    100
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume_percent: default_volume_percent(),
            default_device_name: default_device_name(),
            skip_listen_seconds: default_skip_listen_seconds(),
            play_count: PlayCountPolicy::default(),
            queue_list_default_limit: default_queue_list_limit(),
            queue_list_max_limit: default_queue_list_max_limit(),
        }
    }
}

impl PlaybackConfig {
    /// Reject values the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.default_volume_percent > 100 {
            return Err(CadenceError::invalid_argument(
                "playback.default_volume_percent must be at most 100",
            ));
        }
        if !self.skip_listen_seconds.is_finite() || self.skip_listen_seconds < 0.0 {
            return Err(CadenceError::invalid_argument(
                "playback.skip_listen_seconds must be a non-negative number",
            ));
        }
        if self.queue_list_default_limit < 1 || self.queue_list_max_limit < 1 {
            return Err(CadenceError::invalid_argument(
                "playback queue list limits must be positive",
            ));
        }
        if self.queue_list_default_limit > self.queue_list_max_limit {
            return Err(CadenceError::invalid_argument(
                "playback.queue_list_default_limit exceeds queue_list_max_limit",
            ));
        }
        self.play_count.validate()
    }

    /// Resolve a requested listing size (queue and play history)
    pub fn list_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.queue_list_default_limit)
            .clamp(1, self.queue_list_max_limit)
    }
}

/// When a play counts toward a track's aggregate counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayCountPolicy {
    /// A repeat play of the same track inside this window never counts
    #[serde(default = "default_dedup_window_secs")]
    pub dedup_window_secs: i64,

    /// Upper bound on the listen time required to count
    #[serde(default = "default_max_threshold_secs")]
    pub max_threshold_secs: f64,

    /// Share of the track duration required to count (capped by `max_threshold_secs`)
    #[serde(default = "default_duration_fraction")]
    pub duration_fraction: f64,
}

/// Longest accepted dedup window (one year)
pub const MAX_DEDUP_WINDOW_SECS: i64 = 366 * 24 * 60 * 60;

fn default_dedup_window_secs() -> i64 {
    300
}

fn default_max_threshold_secs() -> f64 {
    30.0
}

fn default_duration_fraction() -> f64 {
    0.5
}

impl Default for PlayCountPolicy {
    fn default() -> Self {
        Self {
            dedup_window_secs: default_dedup_window_secs(),
            max_threshold_secs: default_max_threshold_secs(),
            duration_fraction: default_duration_fraction(),
        }
    }
}

impl PlayCountPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.dedup_window_secs <= 0 || self.dedup_window_secs > MAX_DEDUP_WINDOW_SECS {
            return Err(CadenceError::invalid_argument(format!(
                "playback.play_count.dedup_window_secs must be in 1..={MAX_DEDUP_WINDOW_SECS}"
            )));
        }
        if !(self.duration_fraction > 0.0 && self.duration_fraction <= 1.0) {
            return Err(CadenceError::invalid_argument(
                "playback.play_count.duration_fraction must be in (0, 1]",
            ));
        }
        if !self.max_threshold_secs.is_finite() || self.max_threshold_secs < 0.0 {
            return Err(CadenceError::invalid_argument(
                "playback.play_count.max_threshold_secs must be a non-negative number",
            ));
        }
        Ok(())
    }

    pub fn dedup_window(&self) -> Result<chrono::Duration> {
        chrono::Duration::try_seconds(self.dedup_window_secs).ok_or_else(|| {
            CadenceError::invalid_argument("playback.play_count.dedup_window_secs is out of range")
        })
    }

    /// `min(max_threshold, duration * fraction)`
    pub fn min_required_secs(&self, track_duration_seconds: i64) -> f64 {
        (track_duration_seconds.max(0) as f64 * self.duration_fraction).min(self.max_threshold_secs)
    }

    /// Whether a listen of `play_duration_seconds` is long enough to count.
    /// A play with no reported duration never counts.
    pub fn meets_threshold(
        &self,
        track_duration_seconds: i64,
        play_duration_seconds: Option<f64>,
    ) -> bool {
        match play_duration_seconds {
            Some(listened) => listened >= self.min_required_secs(track_duration_seconds),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PlaybackConfig::default();
        assert_eq!(config.default_volume_percent, 80);
        assert_eq!(config.default_device_name, "Web Player");
        assert_eq!(config.skip_listen_seconds, 30.0);
        assert_eq!(config.play_count.dedup_window_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_is_half_duration_capped_at_thirty_seconds() {
        let policy = PlayCountPolicy::default();

        // 40s track: threshold 20s
        assert_eq!(policy.min_required_secs(40), 20.0);
        assert!(policy.meets_threshold(40, Some(25.0)));
        assert!(!policy.meets_threshold(40, Some(10.0)));

        // 10 minute track: capped at 30s
        assert_eq!(policy.min_required_secs(600), 30.0);
        assert!(policy.meets_threshold(600, Some(30.0)));
        assert!(!policy.meets_threshold(600, Some(29.9)));
    }

    #[test]
    fn missing_duration_never_counts() {
        let policy = PlayCountPolicy::default();
        assert!(!policy.meets_threshold(40, None));
    }

    #[test]
    fn zero_length_track_counts_any_reported_play() {
        let policy = PlayCountPolicy::default();
        assert!(policy.meets_threshold(0, Some(0.0)));
    }

    #[test]
    fn queue_limit_defaults_and_clamps() {
        let config = PlaybackConfig::default();
        assert_eq!(config.list_limit(None), 50);
        assert_eq!(config.list_limit(Some(500)), 100);
        assert_eq!(config.list_limit(Some(0)), 1);
        assert_eq!(config.list_limit(Some(7)), 7);
    }

    #[test]
    fn validate_rejects_bad_fraction() {
        let mut config = PlaybackConfig::default();
        config.play_count.duration_fraction = 1.5;
        assert!(config.validate().is_err());

        config.play_count.duration_fraction = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bounds_dedup_window() {
        let mut config = PlaybackConfig::default();
        config.play_count.dedup_window_secs = MAX_DEDUP_WINDOW_SECS;
        assert!(config.validate().is_ok());

        config.play_count.dedup_window_secs = MAX_DEDUP_WINDOW_SECS + 1;
        assert!(config.validate().is_err());

        config.play_count.dedup_window_secs = i64::MAX;
        assert!(config.validate().is_err());
        assert!(config.play_count.dedup_window().is_err());

        config.play_count.dedup_window_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_style_input_fills_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"skip_listen_seconds": 12.5}"#).unwrap();
        assert_eq!(config.skip_listen_seconds, 12.5);
        assert_eq!(config.default_volume_percent, 80);
        assert_eq!(config.play_count, PlayCountPolicy::default());
    }
}
