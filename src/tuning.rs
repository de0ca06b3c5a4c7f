//! Data-driven game balance
//!
//! Every length, speed and acceleration is authored against the reference
//! 800x600 viewport and multiplied by the viewport scale factor at use.
//! Speeds are per reference frame (1/60 s); durations are in seconds.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Balance values for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player sprite edge length
    pub player_size: f32,
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Upward speed applied by every umbrella bounce
    pub jump_impulse: f32,
    /// Upward speed given by `start()`
    pub start_impulse: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Nudge applied on a slippery landing when nearly stopped
    pub slip_nudge: f32,

    // === Falling ===
    /// Downward speed above which the player counts as falling
    pub fall_threshold: f32,
    /// Seconds of continuous falling that end the run
    pub max_fall_duration: f32,
    /// How far below the viewport (in player sizes) the player may sink
    pub fall_margin: f32,

    // === Camera ===
    pub camera_speed: f32,
    /// Dead-zone upper bound (fraction of viewport height)
    pub camera_upper_bound: f32,
    /// Dead-zone lower bound (fraction of viewport height)
    pub camera_lower_bound: f32,
    /// Upward speed beyond which the camera chases the player's velocity
    pub camera_fast_rise: f32,
    pub camera_velocity_factor: f32,
    /// Cap on the chase speed, as a multiple of `camera_speed`
    pub camera_max_multiplier: f32,
    /// Extra multiplier when the player overshoots a bound by a full body
    pub camera_overshoot_boost: f32,
    /// Downward follow speed, as a fraction of `camera_speed`
    pub camera_down_factor: f32,

    // === Platforms ===
    pub platform_height: f32,
    pub platform_min_width: f32,
    pub platform_max_width: f32,
    /// Width / canopy radius before any rank shrink
    pub umbrella_width_ratio: f32,
    /// Vertical distance between generated levels
    pub step_y: f32,
    /// Random vertical offset (+/-) per generated platform
    pub step_jitter: f32,
    /// Fraction the step shrinks per rank index
    pub step_shrink_per_rank: f32,
    /// Most platforms generated on one level
    pub max_platforms_per_level: u32,
    /// Minimum horizontal clearance between siblings on one level
    pub min_horizontal_gap: f32,
    /// Re-rolls before a conflicting sibling is rejected
    pub placement_attempts: u32,
    /// Live platform cap
    pub max_platforms: usize,
    /// Screens above the visible top the registry keeps populated
    pub reach_screens: f32,
    /// Screens below the camera after which platforms retire
    pub retire_screens: f32,
    /// Extra band (above and below the viewport) checked for collisions
    pub visibility_margin: f32,
    /// Half-height of the canopy hit window
    pub collision_tolerance: f32,
    /// Moving-platform probability at level 0
    pub moving_base_chance: f32,
    /// Moving-platform probability added per level
    pub moving_chance_per_level: f32,
    pub swinging_chance: f32,
    pub slippery_chance: f32,

    // === Temporary platforms ===
    /// Countdown between the fade trigger and removal
    pub temporary_fade_duration: f32,
    pub temporary_min_lifetime: f32,
    pub temporary_max_lifetime: f32,

    // === Initial layout ===
    pub initial_levels: u32,
    pub initial_step_y: f32,

    // === Hazards ===
    /// Band above/below the viewport a raindrop may occupy before recycling
    pub hazard_margin: f32,
    pub hazard_min_size: f32,
    pub hazard_max_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Player
            player_size: 60.0,
            gravity: 0.35,
            jump_impulse: 19.0,
            start_impulse: 18.0,
            move_speed: 8.0,
            slip_nudge: 0.3,

            // Falling
            fall_threshold: 3.0,
            max_fall_duration: 2.5,
            fall_margin: 0.5,

            // Camera
            camera_speed: 3.0,
            camera_upper_bound: 0.25,
            camera_lower_bound: 0.75,
            camera_fast_rise: 5.0,
            camera_velocity_factor: 1.2,
            camera_max_multiplier: 4.0,
            camera_overshoot_boost: 1.5,
            camera_down_factor: 0.8,

            // Platforms
            platform_height: 15.0,
            platform_min_width: 110.0,
            platform_max_width: 160.0,
            umbrella_width_ratio: 2.3,
            step_y: 160.0,
            step_jitter: 20.0,
            step_shrink_per_rank: 0.02,
            max_platforms_per_level: 3,
            min_horizontal_gap: 20.0,
            placement_attempts: 8,
            max_platforms: 45,
            reach_screens: 3.0,
            retire_screens: 2.0,
            visibility_margin: 50.0,
            collision_tolerance: 8.0,
            moving_base_chance: 0.05,
            moving_chance_per_level: 0.02,
            swinging_chance: 0.4,
            slippery_chance: 0.3,

            // Temporary platforms
            temporary_fade_duration: 0.5,
            temporary_min_lifetime: 5.0,
            temporary_max_lifetime: 10.0,

            // Initial layout
            initial_levels: 20,
            initial_step_y: 180.0,

            // Hazards
            hazard_margin: 50.0,
            hazard_min_size: 5.0,
            hazard_max_size: 8.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the active balance)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_size", self.player_size),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("camera_speed", self.camera_speed),
            ("platform_height", self.platform_height),
            ("platform_min_width", self.platform_min_width),
            ("umbrella_width_ratio", self.umbrella_width_ratio),
            ("step_y", self.step_y),
            ("initial_step_y", self.initial_step_y),
            ("temporary_fade_duration", self.temporary_fade_duration),
            ("max_fall_duration", self.max_fall_duration),
            ("hazard_min_size", self.hazard_min_size),
            ("hazard_margin", self.hazard_margin),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::InvalidValue { field, value });
            }
        }

        let fractions = [
            ("camera_upper_bound", self.camera_upper_bound),
            ("camera_lower_bound", self.camera_lower_bound),
            ("swinging_chance", self.swinging_chance),
            ("slippery_chance", self.slippery_chance),
            ("step_shrink_per_rank", self.step_shrink_per_rank),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::InvalidValue { field, value });
            }
        }

        let ranges = [
            (
                ("platform_min_width", self.platform_min_width),
                ("platform_max_width", self.platform_max_width),
            ),
            (
                ("camera_upper_bound", self.camera_upper_bound),
                ("camera_lower_bound", self.camera_lower_bound),
            ),
            (
                ("temporary_min_lifetime", self.temporary_min_lifetime),
                ("temporary_max_lifetime", self.temporary_max_lifetime),
            ),
            (
                ("hazard_min_size", self.hazard_min_size),
                ("hazard_max_size", self.hazard_max_size),
            ),
        ];
        for ((min_field, min), (max_field, max)) in ranges {
            if min > max {
                return Err(TuningError::InvalidRange {
                    min_field,
                    min,
                    max_field,
                    max,
                });
            }
        }

        if self.max_platforms_per_level == 0 {
            return Err(TuningError::InvalidValue {
                field: "max_platforms_per_level",
                value: 0.0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "max_platforms": 30 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.max_platforms, 30);
        assert_eq!(tuning.jump_impulse, Tuning::default().jump_impulse);
    }

    #[test]
    fn test_rejects_non_positive_gravity() {
        let err = Tuning::from_json(r#"{ "gravity": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvalidValue {
                field: "gravity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_width_range() {
        let err =
            Tuning::from_json(r#"{ "platform_min_width": 200, "platform_max_width": 100 }"#)
                .unwrap_err();
        assert!(matches!(err, TuningError::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_json_dump_parses_back() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}
