//! Entity Registry
//!
//! Owns every live actor. Actors sit in a dense vector in insertion order
//! (iteration order is simulation order) with a generational index on the
//! side. Only `add`, `erase` and `clean_up` change the collection's shape;
//! everything else flags actors and lets `clean_up` do the removal.

use glam::Vec3;
use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::game::actor::{Actor, ActorId, Category};
use crate::game::behavior::{update_actor, UpdateContext};
use crate::game::error::SimError;
use crate::game::events::{EventLog, GameEventData};
use crate::game::vehicle::update_occupancy;

/// Read-only view handed to the render sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderView {
    pub id: ActorId,
    pub category: Category,
    pub position: Vec3,
    pub front: Vec3,
    /// Vehicle pitch in degrees, 0 for everything else
    pub tilt: f32,
    pub health: i32,
    pub active: bool,
}

/// Live actor collection.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Actors in insertion order
    actors: Vec<Actor>,
    /// Identity -> position in `actors`
    index: SlotMap<ActorId, usize>,
    /// Active NPCs after the last update
    live_npcs: usize,
    /// Latched once the live NPC count hits zero
    wave_cleared: bool,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked actors.
    #[inline]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Start tracking an actor and return its identity.
    ///
    /// Actors arriving with an identity that is still tracked are rejected.
    pub fn add(&mut self, mut actor: Actor) -> Result<ActorId, SimError> {
        if self.index.contains_key(actor.id) {
            return Err(SimError::DuplicateActor(actor.id));
        }
        let id = self.index.insert(self.actors.len());
        actor.id = id;
        debug!(?id, category = ?actor.category, "actor added");
        self.actors.push(actor);
        Ok(id)
    }

    /// Stop tracking an actor and hand it back to the caller.
    ///
    /// Returns `None` if the identity is not tracked.
    #[must_use = "the erased actor is returned; check it to know whether anything was removed"]
    pub fn erase(&mut self, id: ActorId) -> Option<Actor> {
        let slot = self.index.remove(id)?;
        let actor = self.actors.remove(slot);
        self.reindex(slot);
        self.release_links(id);
        Some(actor)
    }

    /// Remove every actor flagged for deletion. Returns how many went.
    pub fn clean_up(&mut self) -> usize {
        if !self.actors.iter().any(|a| a.to_delete) {
            return 0;
        }

        let mut removed = Vec::new();
        let index = &mut self.index;
        self.actors.retain(|actor| {
            if actor.to_delete {
                index.remove(actor.id);
                removed.push(actor.id);
                false
            } else {
                true
            }
        });
        self.reindex(0);
        for id in &removed {
            self.release_links(*id);
        }
        removed.len()
    }

    /// Run one update pass.
    ///
    /// Records every active actor's rollback position, resolves vehicle
    /// occupancy, runs each active actor's behavior in registry order, moves
    /// riders with their vehicles, adds projectiles fired during the pass,
    /// then recomputes the live NPC count.
    pub fn update(&mut self, ctx: &UpdateContext<'_>, log: &mut EventLog) {
        for actor in self.actors.iter_mut().filter(|a| a.active) {
            actor.store_position();
        }

        update_occupancy(self, ctx.inputs, &ctx.config.vehicle, log);

        let mut spawned = Vec::new();
        for actor in &mut self.actors {
            if actor.active {
                update_actor(actor, ctx, &mut spawned);
            } else if matches!(actor.category, Category::Projectile | Category::Ammo) {
                actor.to_delete = true;
            }
        }

        self.carry_riders();

        for actor in spawned {
            if let Err(err) = self.add(actor) {
                warn!(%err, "dropped spawned actor");
            }
        }

        self.update_wave(log);
    }

    /// Hand each actor, in order, to `sink`. Never mutates simulation state.
    pub fn render<F>(&self, mut sink: F)
    where
        F: FnMut(RenderView),
    {
        for actor in &self.actors {
            sink(RenderView {
                id: actor.id,
                category: actor.category,
                position: actor.position,
                front: actor.front,
                tilt: actor.vehicle.as_ref().map_or(0.0, |v| v.tilt()),
                health: actor.health,
                active: actor.active,
            });
        }
    }

    /// Active NPCs after the last update.
    #[inline]
    pub fn live_npc_count(&self) -> usize {
        self.live_npcs
    }

    /// Whether the wave has been cleared.
    #[inline]
    pub fn is_wave_cleared(&self) -> bool {
        self.wave_cleared
    }

    /// Check if an identity is tracked.
    #[inline]
    pub fn contains(&self, id: ActorId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of an actor in iteration order.
    #[inline]
    pub fn index_of(&self, id: ActorId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.index_of(id).map(|i| &self.actors[i])
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        let i = self.index_of(id)?;
        self.actors.get_mut(i)
    }

    /// Actors in iteration order.
    #[inline]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Iterate actors in order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    /// Borrow two distinct actors mutably by position.
    ///
    /// # Panics
    ///
    /// Panics if `a == b` or either is out of range.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Actor, &mut Actor) {
        assert_ne!(a, b, "pair_mut needs two distinct actors");
        if a < b {
            let (left, right) = self.actors.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.actors.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    fn reindex(&mut self, from: usize) {
        for (i, actor) in self.actors.iter().enumerate().skip(from) {
            if let Some(slot) = self.index.get_mut(actor.id) {
                *slot = i;
            }
        }
    }

    /// Drop occupancy links that point at a removed actor.
    fn release_links(&mut self, removed: ActorId) {
        for actor in &mut self.actors {
            if actor.riding == Some(removed) {
                warn!(rider = ?actor.id, vehicle = ?removed, "vehicle removed under its rider");
                actor.riding = None;
            }
            if let Some(vehicle) = actor.vehicle.as_mut() {
                if vehicle.rider() == Some(removed) {
                    vehicle.unbind();
                }
            }
        }
    }

    /// Snap every bound rider onto its vehicle.
    ///
    /// Runs after the update pass and again after collision resolution, so
    /// a vehicle rolled back by combat takes its rider with it.
    pub fn carry_riders(&mut self) {
        let mut moves = Vec::new();
        for car in self.actors.iter().filter(|a| a.category == Category::Car) {
            if let Some(rider) = car.vehicle.as_ref().and_then(|v| v.rider()) {
                moves.push((rider, car.position, car.front));
            }
        }
        for (rider, position, front) in moves {
            if let Some(actor) = self.get_mut(rider) {
                actor.position = position;
                actor.front = front;
            }
        }
    }

    fn update_wave(&mut self, log: &mut EventLog) {
        self.live_npcs = self
            .actors
            .iter()
            .filter(|a| a.category == Category::Npc && a.active)
            .count();

        if self.live_npcs == 0 && !self.wave_cleared {
            self.wave_cleared = true;
            info!("wave cleared");
            log.push(GameEventData::WaveCleared);
        }
    }
}
