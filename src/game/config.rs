//! Simulation Configuration
//!
//! Tunables for every subsystem. `Default` carries the values the game
//! ships with; JSON files may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::game::error::SimError;

/// Vertical motion tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity magnitude for grounded actors (units/s²)
    pub gravity: f32,
    /// Initial upward velocity on jump (units/s)
    pub jump_velocity: f32,
    /// Distance kept between an actor's position and the terrain
    pub ground_offset: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            jump_velocity: 1.2,
            ground_offset: 0.0,
        }
    }
}

/// Player ground locomotion tunables.
///
/// Accumulators integrate `rate * dt²` per tick, so rates are large.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Base accumulator acceleration
    pub base_accel: f32,
    /// Base accumulator clamp, symmetric: [-max, +max]
    pub max_speed: f32,
    /// Sprint accumulator acceleration magnitude
    pub sprint_accel: f32,
    /// Sprint accumulator clamp
    pub sprint_range: [f32; 2],
    /// Crouch accumulator acceleration while sliding
    pub slide_accel: f32,
    /// Decay rate for crouch (and sprint while crouched)
    pub crouch_decay: f32,
    /// Crouch accumulator clamp
    pub crouch_range: [f32; 2],
    /// Total velocity needed to start a slide
    pub slide_entry_velocity: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            base_accel: 10.0,
            max_speed: 0.1,
            sprint_accel: 50.0,
            sprint_range: [0.0, 0.1],
            slide_accel: 50.0,
            crouch_decay: 10.0,
            crouch_range: [-0.05, 0.1],
            slide_entry_velocity: 0.2,
        }
    }
}

/// Vehicle tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Engine acceleration magnitude while throttle is held
    pub engine_accel: f32,
    /// Linear friction coefficient (speed decays by `speed * friction * dt`)
    pub friction: f32,
    /// Steering rate (degrees/s)
    pub torque_rate: f32,
    /// Steering only applies above this absolute speed
    pub steer_min_speed: f32,
    /// Per-tick displacement cap
    pub max_step: f32,
    /// Riders closer than this may mount
    pub mount_radius: f32,
    /// Sideways offset used to place a dismounting rider
    pub dismount_offset: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            engine_accel: 3000.0,
            friction: 1.0,
            torque_rate: 80.0,
            steer_min_speed: 0.5,
            max_step: 0.5,
            mount_radius: 5.0,
            dismount_offset: 2.0,
        }
    }
}

/// Combat tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Spare rounds granted by an ammo pickup
    pub ammo_bonus: i32,
    /// Linear friction applied to knockback velocity on NPCs and others
    pub knockback_friction: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            ammo_bonus: 30,
            knockback_friction: 1.0,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Vertical motion
    pub physics: PhysicsConfig,
    /// Player locomotion
    pub locomotion: LocomotionConfig,
    /// Vehicles
    pub vehicle: VehicleConfig,
    /// Combat rules
    pub combat: CombatConfig,
}

impl SimConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would let physics produce garbage.
    pub fn validate(&self) -> Result<(), SimError> {
        let p = &self.physics;
        check_finite("physics.gravity", p.gravity)?;
        check_finite("physics.jump_velocity", p.jump_velocity)?;
        check_finite("physics.ground_offset", p.ground_offset)?;
        check_non_negative("physics.gravity", p.gravity)?;

        let l = &self.locomotion;
        check_non_negative("locomotion.base_accel", l.base_accel)?;
        check_non_negative("locomotion.max_speed", l.max_speed)?;
        check_non_negative("locomotion.sprint_accel", l.sprint_accel)?;
        check_non_negative("locomotion.slide_accel", l.slide_accel)?;
        check_non_negative("locomotion.crouch_decay", l.crouch_decay)?;
        check_non_negative("locomotion.slide_entry_velocity", l.slide_entry_velocity)?;
        check_range("locomotion.sprint_range", l.sprint_range)?;
        check_range("locomotion.crouch_range", l.crouch_range)?;

        let v = &self.vehicle;
        check_non_negative("vehicle.engine_accel", v.engine_accel)?;
        check_non_negative("vehicle.friction", v.friction)?;
        check_non_negative("vehicle.torque_rate", v.torque_rate)?;
        check_non_negative("vehicle.steer_min_speed", v.steer_min_speed)?;
        check_non_negative("vehicle.max_step", v.max_step)?;
        check_non_negative("vehicle.mount_radius", v.mount_radius)?;
        check_finite("vehicle.dismount_offset", v.dismount_offset)?;

        let c = &self.combat;
        if c.ammo_bonus < 0 {
            return Err(SimError::InvalidConfig {
                field: "combat.ammo_bonus",
                reason: "must not be negative".into(),
            });
        }
        check_non_negative("combat.knockback_friction", c.knockback_friction)?;
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            reason: format!("{value} is not finite"),
        })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), SimError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(SimError::InvalidConfig {
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

fn check_range(field: &'static str, [min, max]: [f32; 2]) -> Result<(), SimError> {
    check_finite(field, min)?;
    check_finite(field, max)?;
    if min > max {
        return Err(SimError::InvalidConfig {
            field,
            reason: format!("min {min} exceeds max {max}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "physics": { "gravity": 20.0 } }"#).unwrap();
        assert_eq!(config.physics.gravity, 20.0);
        assert_eq!(config.physics.jump_velocity, 1.2);
        assert_eq!(config.combat.ammo_bonus, 30);
        assert_eq!(config.vehicle, VehicleConfig::default());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let json = r#"{ "locomotion": { "sprint_range": [0.5, 0.1] } }"#;
        let err = SimConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig { field: "locomotion.sprint_range", .. }
        ));
    }

    #[test]
    fn test_negative_gravity_rejected() {
        let mut config = SimConfig::default();
        config.physics.gravity = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
