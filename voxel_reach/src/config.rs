// Data-driven reachability configuration.
//
// The tunable constants of the reach test live in `ReachConfig`, loadable
// from JSON so callers can match the interaction rules of whatever world
// they drive. Missing fields fall back to the defaults, which reproduce the
// standard survival-mode rules: 5 units of reach, 256 march steps, a step of
// 5/16 of the eye-to-target offset, and a 1.8-unit tall agent.
//
// The step is a fraction of the whole offset, not a fixed world length, so
// every trace crosses the full distance in `1 / step_fraction` steps and
// longer rays are sampled more coarsely. That is the intended behavior of
// the tracer, not something `validate()` corrects.
//
// See also: `raytrace.rs` and `goal.rs`, which read these values.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachConfig {
    /// Upper bound on voxel samples per trace. This is the only latency
    /// bound a trace has.
    pub max_steps: u32,
    /// Fraction of the eye-to-target offset advanced per step (0, 1].
    pub step_fraction: f64,
    /// Traces from at least this far away fail without sampling.
    pub reach_distance: f64,
    /// Height of the agent above its standing voxel; the eye sits here.
    pub agent_height: f64,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            max_steps: 256,
            step_fraction: 5.0 / 16.0,
            reach_distance: 5.0,
            agent_height: 1.8,
        }
    }
}

impl ReachConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "max_steps",
                reason: "must be at least 1",
            });
        }
        if !(self.step_fraction > 0.0 && self.step_fraction <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "step_fraction",
                reason: "must be in (0, 1]",
            });
        }
        if !(self.reach_distance.is_finite() && self.reach_distance > 0.0) {
            return Err(ConfigError::Invalid {
                field: "reach_distance",
                reason: "must be positive and finite",
            });
        }
        if !(self.agent_height.is_finite() && self.agent_height >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "agent_height",
                reason: "must be non-negative and finite",
            });
        }
        Ok(())
    }
}
