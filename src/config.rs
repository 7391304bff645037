//! Behavior Configuration
//!
//! Every tunable of the orchestration core lives in [`BehaviorConfig`].
//! Defaults match the values the behavior layer was authored against, so
//! `BehaviorConfig::default()` is always a valid configuration. A partial
//! JSON document can override individual fields via [`BehaviorConfig::from_json`].

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Tunables for the behavior state machine, the context selector and the
/// clip blend manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    // ========================================================================
    // State machine timers (seconds)
    // ========================================================================
    /// Idle time without a registered interaction before falling asleep.
    pub inactivity_threshold: f32,
    /// Lower bound of the randomized idle-behavior interval.
    pub idle_behavior_min: f32,
    /// Upper bound of the randomized idle-behavior interval.
    pub idle_behavior_max: f32,
    /// How long the playful state lasts before returning to idle.
    pub playful_timeout: f32,
    /// How long the curious state lasts before returning to idle.
    pub curious_timeout: f32,
    /// An interaction within this window of a sleep-state check wakes the
    /// character back up.
    pub wake_recency_window: f32,

    // ========================================================================
    // Clip blending (seconds)
    // ========================================================================
    /// Default cross-fade duration for state-driven clip changes.
    pub default_fade: f32,
    /// Grace delay between a play-once clip finishing and the automatic
    /// return to the idle clip.
    pub idle_return_grace: f32,
    /// Name of the clip treated as the idle/rest pose.
    pub idle_clip: String,
    /// Name of the clip used for the sleep pose.
    pub sleep_clip: String,

    // ========================================================================
    // Context selection
    // ========================================================================
    /// Minimum weighted score a context mapping must exceed to fire.
    pub context_score_threshold: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold: 60.0,
            idle_behavior_min: 10.0,
            idle_behavior_max: 20.0,
            playful_timeout: 3.0,
            curious_timeout: 4.0,
            wake_recency_window: 5.0,

            default_fade: 0.4,
            idle_return_grace: 0.25,
            idle_clip: "idle".to_string(),
            sleep_clip: "sleep".to_string(),

            context_score_threshold: 1.5,
        }
    }
}

impl BehaviorConfig {
    /// Parses a configuration from a JSON document. Missing fields fall
    /// back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.idle_behavior_min <= 0.0 || self.idle_behavior_max < self.idle_behavior_min {
            return Err(EngineError::InvalidConfig {
                field: "idle_behavior_min/idle_behavior_max",
                reason: format!(
                    "expected 0 < min <= max, got {} and {}",
                    self.idle_behavior_min, self.idle_behavior_max
                ),
            });
        }
        if self.inactivity_threshold <= 0.0 {
            return Err(EngineError::InvalidConfig {
                field: "inactivity_threshold",
                reason: format!("must be positive, got {}", self.inactivity_threshold),
            });
        }
        Ok(())
    }
}
