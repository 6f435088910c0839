//! Vertical Motion
//!
//! Idle / Jump / Fall state machine under constant gravity. Each grounded
//! actor owns one `VerticalPhysics`; vehicles own one with zero gravity,
//! which never leaves `Idle`.

use serde::{Deserialize, Serialize};

/// Vertical motion mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalMode {
    /// Resting on the terrain
    #[default]
    Idle,
    /// Rising after a jump
    Jump,
    /// Falling toward the terrain
    Fall,
}

/// Per-actor vertical state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerticalPhysics {
    /// Current mode
    mode: VerticalMode,
    /// Time since the current airborne phase began
    elapsed: f32,
    /// Vertical velocity at jump entry
    initial_velocity: f32,
    /// Gravity magnitude (0 disables airborne motion)
    gravity: f32,
    /// Vertical displacement applied on the most recent step
    last_step: f32,
}

impl VerticalPhysics {
    /// Create a state machine at rest.
    pub fn new(gravity: f32) -> Self {
        Self {
            mode: VerticalMode::Idle,
            elapsed: 0.0,
            initial_velocity: 0.0,
            gravity: gravity.max(0.0),
            last_step: 0.0,
        }
    }

    /// Create a state machine that starts airborne, falling from rest.
    pub fn falling(gravity: f32) -> Self {
        let mut physics = Self::new(gravity);
        if physics.gravity > 0.0 {
            physics.mode = VerticalMode::Fall;
        }
        physics
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> VerticalMode {
        self.mode
    }

    /// Gravity magnitude.
    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Vertical displacement applied on the most recent step.
    #[inline]
    pub fn last_step(&self) -> f32 {
        self.last_step
    }

    /// Current vertical velocity.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.initial_velocity - self.gravity * self.elapsed
    }

    /// Check if resting on the ground.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.mode == VerticalMode::Idle
    }

    /// Start a jump. Only honoured from `Idle`, and never without gravity.
    ///
    /// Returns true if the jump started.
    pub fn trigger_jump(&mut self, initial_velocity: f32) -> bool {
        if self.mode != VerticalMode::Idle || self.gravity <= 0.0 || initial_velocity <= 0.0 {
            return false;
        }
        self.mode = VerticalMode::Jump;
        self.initial_velocity = initial_velocity;
        self.elapsed = 0.0;
        self.last_step = 0.0;
        true
    }

    /// Advance one tick and return the new vertical position.
    ///
    /// `ground` is terrain height plus ground offset at the actor's current
    /// planar position.
    pub fn step(&mut self, y: f32, ground: f32, dt: f32) -> f32 {
        match self.mode {
            VerticalMode::Idle => {
                self.last_step = 0.0;
                ground
            }
            VerticalMode::Jump => {
                let delta = self.integrate(dt);
                let mut y = y + delta;
                if y < ground {
                    y = ground;
                }
                if delta <= 0.0 {
                    // Apex reached
                    self.mode = VerticalMode::Fall;
                }
                y
            }
            VerticalMode::Fall => {
                let y = y + self.integrate(dt);
                if y <= ground {
                    self.land();
                    ground
                } else {
                    y
                }
            }
        }
    }

    /// Semi-implicit gravity step: velocity at the end of the step times dt.
    fn integrate(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        let delta = self.velocity() * dt;
        self.last_step = delta;
        delta
    }

    fn land(&mut self) {
        self.mode = VerticalMode::Idle;
        self.elapsed = 0.0;
        self.initial_velocity = 0.0;
    }
}
