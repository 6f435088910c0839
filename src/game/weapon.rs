//! Weapons
//!
//! The capability surface actors fire through. The simulation only ever
//! talks to `dyn Weapon`; `Firearm` is the stock implementation covering
//! ranged guns and melee blades.

use std::fmt;

use glam::Vec3;

use crate::game::actor::{Actor, ActorId};

// =============================================================================
// Capability
// =============================================================================

/// Weapon capability invoked by actors.
pub trait Weapon: fmt::Debug + Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Try to fire from `origin` along `direction`.
    ///
    /// Ranged weapons push the spawned projectile into `out`; the registry
    /// adds it after the current update pass. Returns true if the weapon
    /// fired.
    fn discharge(&mut self, origin: Vec3, direction: Vec3, source: ActorId, out: &mut Vec<Actor>) -> bool;

    /// Start a reload.
    fn reload(&mut self);

    /// Advance cooldown, reload and swing timers.
    fn update(&mut self, dt: f32);

    /// Rounds in the magazine.
    fn mag_rounds(&self) -> i32;

    /// Magazine capacity.
    fn max_mag_rounds(&self) -> i32;

    /// Spare rounds outside the magazine.
    fn total_rounds(&self) -> i32;

    /// Nominal spare round capacity.
    fn max_total_rounds(&self) -> i32;

    /// Overwrite the spare round count.
    fn set_total_rounds(&mut self, rounds: i32);

    /// Damage per hit.
    fn damage(&self) -> i32;

    /// Whether a melee swing is in progress.
    fn is_melee_attacking(&self) -> bool;

    /// Whether holding fire keeps discharging.
    fn auto_fire(&self) -> bool;
}

// =============================================================================
// Firearm
// =============================================================================

/// Projectile tuning for ranged weapons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ballistics {
    /// Muzzle speed (units/s)
    pub speed: f32,
    /// Seconds before the projectile expires
    pub lifetime: f32,
    /// Half extent of the projectile box
    pub half_extent: f32,
}

impl Default for Ballistics {
    fn default() -> Self {
        Self {
            speed: 40.0,
            lifetime: 2.0,
            half_extent: 0.05,
        }
    }
}

/// Magazine-fed or melee weapon.
#[derive(Clone, Debug)]
pub struct Firearm {
    name: &'static str,
    mag_rounds: i32,
    max_mag_rounds: i32,
    total_rounds: i32,
    max_total_rounds: i32,
    damage: i32,
    auto_fire: bool,
    /// None for melee weapons
    ballistics: Option<Ballistics>,
    /// Minimum seconds between discharges
    time_between_shots: f32,
    cooldown: f32,
    reload_time: f32,
    /// Seconds until the pending reload completes
    reloading: Option<f32>,
    /// Duration of one melee swing
    swing_time: f32,
    swing_remaining: f32,
}

impl Firearm {
    /// Semi-automatic sidearm.
    pub fn pistol() -> Self {
        Self {
            name: "Pistol",
            mag_rounds: 8,
            max_mag_rounds: 8,
            total_rounds: 40,
            max_total_rounds: 40,
            damage: 5,
            auto_fire: false,
            ballistics: Some(Ballistics::default()),
            time_between_shots: 0.06,
            cooldown: 0.0,
            reload_time: 1.5,
            reloading: None,
            swing_time: 0.0,
            swing_remaining: 0.0,
        }
    }

    /// Fully automatic gun.
    pub fn submachine_gun() -> Self {
        Self {
            name: "Submachine Gun",
            mag_rounds: 50,
            max_mag_rounds: 50,
            total_rounds: 100,
            max_total_rounds: 100,
            damage: 8,
            auto_fire: true,
            ballistics: Some(Ballistics::default()),
            time_between_shots: 0.07,
            cooldown: 0.0,
            reload_time: 2.0,
            reloading: None,
            swing_time: 0.0,
            swing_remaining: 0.0,
        }
    }

    /// Melee blade. Never spawns projectiles; damage lands through contact
    /// while a swing is active.
    pub fn knife() -> Self {
        Self {
            name: "Knife",
            mag_rounds: 0,
            max_mag_rounds: 0,
            total_rounds: 0,
            max_total_rounds: 0,
            damage: 5,
            auto_fire: false,
            ballistics: None,
            time_between_shots: 0.3,
            cooldown: 0.0,
            reload_time: 0.0,
            reloading: None,
            swing_time: 0.3,
            swing_remaining: 0.0,
        }
    }

    /// Override the projectile tuning. No effect on melee weapons.
    pub fn with_ballistics(mut self, ballistics: Ballistics) -> Self {
        if self.ballistics.is_some() {
            self.ballistics = Some(ballistics);
        }
        self
    }

    /// Override damage per hit.
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage.max(0);
        self
    }

    /// Whether this weapon swings instead of shooting.
    #[inline]
    pub fn is_melee(&self) -> bool {
        self.ballistics.is_none()
    }

    /// Whether a reload is pending.
    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.reloading.is_some()
    }

    fn finish_reload(&mut self) {
        let wanted = (self.max_mag_rounds - self.mag_rounds).max(0);
        let moved = wanted.min(self.total_rounds);
        self.mag_rounds += moved;
        self.total_rounds -= moved;
        self.reloading = None;
    }
}

impl Weapon for Firearm {
    fn name(&self) -> &str {
        self.name
    }

    fn discharge(&mut self, origin: Vec3, direction: Vec3, source: ActorId, out: &mut Vec<Actor>) -> bool {
        if self.cooldown > 0.0 || self.reloading.is_some() {
            return false;
        }

        let Some(ballistics) = self.ballistics else {
            self.swing_remaining = self.swing_time;
            self.cooldown = self.time_between_shots;
            return true;
        };

        if self.mag_rounds <= 0 {
            return false;
        }
        let Some(direction) = direction.try_normalize() else {
            return false;
        };

        self.mag_rounds -= 1;
        self.cooldown = self.time_between_shots;
        out.push(Actor::projectile(
            origin,
            direction,
            ballistics.speed,
            ballistics.half_extent,
            source,
            self.damage,
            ballistics.lifetime,
        ));
        true
    }

    fn reload(&mut self) {
        if self.is_melee()
            || self.reloading.is_some()
            || self.mag_rounds >= self.max_mag_rounds
            || self.total_rounds <= 0
        {
            return;
        }
        self.reloading = Some(self.reload_time);
    }

    fn update(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.swing_remaining = (self.swing_remaining - dt).max(0.0);
        if let Some(remaining) = self.reloading {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.finish_reload();
            } else {
                self.reloading = Some(remaining);
            }
        }
    }

    fn mag_rounds(&self) -> i32 {
        self.mag_rounds
    }

    fn max_mag_rounds(&self) -> i32 {
        self.max_mag_rounds
    }

    fn total_rounds(&self) -> i32 {
        self.total_rounds
    }

    fn max_total_rounds(&self) -> i32 {
        self.max_total_rounds
    }

    fn set_total_rounds(&mut self, rounds: i32) {
        self.total_rounds = rounds.max(0);
    }

    fn damage(&self) -> i32 {
        self.damage
    }

    fn is_melee_attacking(&self) -> bool {
        self.swing_remaining > 0.0
    }

    fn auto_fire(&self) -> bool {
        self.auto_fire
    }
}
