//! Simulation Tick
//!
//! `World` owns the registry, configuration and terrain handle, and runs
//! the per-tick pipeline: update, collision, clean-up.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::terrain::Terrain;
use crate::game::actor::{Actor, ActorId, Category};
use crate::game::behavior::UpdateContext;
use crate::game::combat::check_for_collision;
use crate::game::config::SimConfig;
use crate::game::error::SimError;
use crate::game::events::{EventLog, GameEvent};
use crate::game::input::InputFrame;
use crate::game::registry::{EntityRegistry, RenderView};
use crate::game::weapon::Weapon;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, in processing order
    pub events: Vec<GameEvent>,
    /// Whether any damaging hit landed
    pub damaging_hit: bool,
    /// Hit angle for the hit marker, set when `damaging_hit` is
    pub hit_angle: Option<f32>,
    /// Actors removed by clean-up
    pub removed: usize,
}

/// Weapon counters for the HUD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponReadout {
    pub name: String,
    pub mag_rounds: i32,
    pub max_mag_rounds: i32,
    pub total_rounds: i32,
    pub max_total_rounds: i32,
}

impl WeaponReadout {
    fn of(weapon: &dyn Weapon) -> Self {
        Self {
            name: weapon.name().to_owned(),
            mag_rounds: weapon.mag_rounds(),
            max_mag_rounds: weapon.max_mag_rounds(),
            total_rounds: weapon.total_rounds(),
            max_total_rounds: weapon.max_total_rounds(),
        }
    }
}

/// Everything the HUD shows for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Live NPCs
    pub enemy_count: usize,
    pub wave_cleared: bool,
    pub health: i32,
    pub active: bool,
    /// Vehicle the player rides
    pub riding: Option<ActorId>,
    /// Vehicle weapon while riding, hand weapon otherwise
    pub weapon: Option<WeaponReadout>,
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for `World`. A terrain handle is required.
#[derive(Default)]
pub struct WorldBuilder {
    config: Option<SimConfig>,
    terrain: Option<Arc<dyn Terrain>>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of the defaults.
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Terrain height source.
    pub fn terrain(mut self, terrain: Arc<dyn Terrain>) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Validate and build. Fails before any tick can run.
    pub fn build(self) -> Result<World, SimError> {
        let terrain = self.terrain.ok_or(SimError::MissingTerrain)?;
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(World {
            tick: 0,
            config,
            terrain,
            registry: EntityRegistry::new(),
        })
    }
}

// =============================================================================
// World
// =============================================================================

/// A running simulation.
pub struct World {
    /// Ticks run so far
    tick: u64,
    config: SimConfig,
    terrain: Arc<dyn Terrain>,
    registry: EntityRegistry,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Start building a world.
    pub fn builder() -> WorldBuilder {
        WorldBuilder::new()
    }

    /// Ticks run so far.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Actor collection.
    #[inline]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Add an actor built by an outside factory.
    pub fn spawn(&mut self, actor: Actor) -> Result<ActorId, SimError> {
        self.registry.add(actor)
    }

    /// Remove an actor and hand it back.
    #[must_use = "the erased actor is returned; check it to know whether anything was removed"]
    pub fn erase(&mut self, id: ActorId) -> Option<Actor> {
        self.registry.erase(id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.registry.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.registry.get_mut(id)
    }

    /// Point an actor (usually a player following its camera) along `front`.
    pub fn set_facing(&mut self, id: ActorId, front: Vec3) -> bool {
        match (self.registry.get_mut(id), front.try_normalize()) {
            (Some(actor), Some(front)) => {
                actor.front = front;
                true
            }
            _ => false,
        }
    }

    /// Run one simulation tick.
    ///
    /// `dt` is the elapsed time in seconds; negative or non-finite values
    /// run the tick with zero elapsed time.
    pub fn tick(&mut self, inputs: &BTreeMap<ActorId, InputFrame>, dt: f32) -> TickResult {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "invalid elapsed time, clamping to zero");
            0.0
        };

        self.tick += 1;
        let mut log = EventLog::new(self.tick);

        // 1. Movement and physics
        let ctx = UpdateContext {
            terrain: &*self.terrain,
            config: &self.config,
            inputs,
            dt,
        };
        self.registry.update(&ctx, &mut log);

        // 2. Collision and combat
        let outcome = check_for_collision(&mut self.registry, &self.config.combat, &mut log);
        // Rollbacks may have moved vehicles
        self.registry.carry_riders();

        // 3. Deferred removal
        let removed = self.registry.clean_up();

        let events = log.take();
        debug!(tick = self.tick, events = events.len(), removed, "tick complete");

        TickResult {
            events,
            damaging_hit: outcome.damaging,
            hit_angle: outcome.damaging.then_some(outcome.hit_angle),
            removed,
        }
    }

    /// Hand every actor to `sink` in registry order.
    pub fn render<F>(&self, sink: F)
    where
        F: FnMut(RenderView),
    {
        self.registry.render(sink);
    }

    /// HUD state for a player.
    pub fn hud(&self, player: ActorId) -> Option<HudSnapshot> {
        let actor = self.registry.get(player)?;
        if actor.category != Category::Player {
            return None;
        }

        let vehicle_weapon = actor
            .riding
            .and_then(|car| self.registry.get(car))
            .and_then(|car| car.vehicle.as_ref())
            .and_then(|vehicle| vehicle.weapon());
        let weapon = match actor.riding {
            Some(_) => vehicle_weapon,
            None => actor.weapon(),
        };

        Some(HudSnapshot {
            enemy_count: self.registry.live_npc_count(),
            wave_cleared: self.registry.is_wave_cleared(),
            health: actor.health,
            active: actor.active,
            riding: actor.riding,
            weapon: weapon.map(WeaponReadout::of),
        })
    }
}
