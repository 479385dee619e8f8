//! Auto-play timing.

use serde::{Deserialize, Serialize};

const fn default_base_period_ms() -> u64 {
    2000
}

fn default_speeds() -> Vec<f64> {
    vec![0.5, 1.0, 1.5, 2.0]
}

const fn default_speed() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Tick period at speed 1.0; the effective period is `base / speed`.
    #[serde(default = "default_base_period_ms")]
    pub base_period_ms: u64,

    /// Speed multipliers offered to the user.
    #[serde(default = "default_speeds")]
    pub speeds: Vec<f64>,

    #[serde(default = "default_speed")]
    pub default_speed: f64,
}

impl PlaybackConfig {
    /// Whether `speed` is one of the offered multipliers.
    #[must_use]
    pub fn offers(&self, speed: f64) -> bool {
        self.speeds.iter().any(|s| (s - speed).abs() < f64::EPSILON)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_period_ms: default_base_period_ms(),
            speeds: default_speeds(),
            default_speed: default_speed(),
        }
    }
}
