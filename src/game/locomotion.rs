//! Ground Locomotion
//!
//! Layered horizontal velocity for players. Three accumulators (base,
//! sprint, crouch) each integrate `rate * dt²` per tick and clamp to their
//! own range; the movement speed for the tick is their sum.
//!
//! Mode changes only swap the acceleration inputs. Accumulators are never
//! reset, so switching between walk, sprint and crouch changes the rate of
//! change of velocity but never the velocity itself.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::math::{approach_zero, right_of, REFERENCE_FORWARD};
use crate::game::config::LocomotionConfig;

/// Player movement mode for a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocomotionMode {
    /// Normal movement
    Walk,
    /// Sprint held
    Sprint,
    /// Crouch held (slides when entered at full speed)
    Crouch,
    /// No movement requested
    #[default]
    Rest,
}

/// One of the four movement directions relative to the actor's facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDirection {
    /// Unit basis vector for this direction given a forward vector.
    ///
    /// Only the planar part of `front` is used, so looking up or down does
    /// not move the actor vertically.
    pub fn basis(self, front: Vec3) -> Vec3 {
        let forward = Vec3::new(front.x, 0.0, front.z)
            .try_normalize()
            .unwrap_or(REFERENCE_FORWARD);
        match self {
            MoveDirection::Forward => forward,
            MoveDirection::Backward => -forward,
            MoveDirection::Right => right_of(forward),
            MoveDirection::Left => -right_of(forward),
        }
    }
}

/// Per-player velocity accumulators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocomotionState {
    /// Mode used on the most recent step
    mode: LocomotionMode,
    /// Base accumulator
    base: f32,
    /// Sprint accumulator
    sprint_delta: f32,
    /// Crouch accumulator
    crouch_delta: f32,
    /// Crouch may still accelerate into a slide
    sliding: bool,
    /// Sum of the accumulators after the most recent step
    total: f32,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self::new()
    }
}

impl LocomotionState {
    /// Create a state at rest.
    pub fn new() -> Self {
        Self {
            mode: LocomotionMode::Rest,
            base: 0.0,
            sprint_delta: 0.0,
            crouch_delta: 0.0,
            sliding: true,
            total: 0.0,
        }
    }

    /// Mode used on the most recent step.
    #[inline]
    pub fn mode(&self) -> LocomotionMode {
        self.mode
    }

    /// Base accumulator.
    #[inline]
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Sprint accumulator.
    #[inline]
    pub fn sprint_delta(&self) -> f32 {
        self.sprint_delta
    }

    /// Crouch accumulator.
    #[inline]
    pub fn crouch_delta(&self) -> f32 {
        self.crouch_delta
    }

    /// Whether crouch can still accelerate into a slide.
    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    /// Combined speed from the most recent step.
    #[inline]
    pub fn total_velocity(&self) -> f32 {
        self.total
    }

    /// Advance the accumulators one tick and return the combined speed.
    pub fn step(&mut self, mode: LocomotionMode, config: &LocomotionConfig, dt: f32) -> f32 {
        let dt2 = dt * dt;
        let [sprint_min, sprint_max] = config.sprint_range;
        let [crouch_min, crouch_max] = config.crouch_range;
        // Slide entry reads the speed from the previous tick
        let prior_total = self.total;
        self.mode = mode;

        // Rates for this tick. `None` for crouch means decay toward zero.
        let (sprint_rate, crouch_rate) = match mode {
            LocomotionMode::Rest => {
                self.base = 0.0;
                self.sliding = true;
                (-config.sprint_accel, None)
            }
            LocomotionMode::Walk => {
                self.sliding = true;
                (-config.sprint_accel, None)
            }
            LocomotionMode::Sprint => {
                self.sliding = true;
                (config.sprint_accel, None)
            }
            LocomotionMode::Crouch => {
                if self.crouch_delta >= crouch_max && self.sliding {
                    self.sliding = false;
                    (0.0, Some(0.0))
                } else if prior_total >= config.slide_entry_velocity && self.sliding {
                    (0.0, Some(config.slide_accel))
                } else {
                    (-config.crouch_decay, Some(-config.crouch_decay))
                }
            }
        };

        if mode != LocomotionMode::Rest {
            self.base = (self.base + config.base_accel * dt2).clamp(-config.max_speed, config.max_speed);
        }

        self.sprint_delta = (self.sprint_delta + sprint_rate * dt2).clamp(sprint_min, sprint_max);

        self.crouch_delta = match crouch_rate {
            Some(rate) => self.crouch_delta + rate * dt2,
            None => approach_zero(self.crouch_delta, config.crouch_decay * dt2),
        }
        .clamp(crouch_min, crouch_max);

        self.total = self.base + self.sprint_delta + self.crouch_delta;
        self.total
    }

    /// Displacement for this tick along the requested directions.
    pub fn displacement(
        &self,
        directions: impl IntoIterator<Item = MoveDirection>,
        front: Vec3,
    ) -> Vec3 {
        if self.mode == LocomotionMode::Rest {
            return Vec3::ZERO;
        }
        directions
            .into_iter()
            .map(|d| d.basis(front) * self.total)
            .sum()
    }
}
