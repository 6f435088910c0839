//! Per-Category Movement
//!
//! One movement strategy per category, selected by the tag. Strategies only
//! touch the actor they are handed; anything they create (projectiles) goes
//! into the `spawned` queue for the registry to add after the pass.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::core::math::sanitize;
use crate::core::terrain::Terrain;
use crate::game::actor::{Actor, ActorId, Category};
use crate::game::config::SimConfig;
use crate::game::input::InputFrame;

/// Distance ahead of a player where its shots spawn.
const PLAYER_MUZZLE: f32 = 1.0;

/// Distance ahead of a car where its shots spawn (clears the car's own box).
const CAR_MUZZLE: f32 = 3.0;

/// Everything an actor may read while updating.
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Ground height source
    pub terrain: &'a dyn Terrain,
    /// Tunables
    pub config: &'a SimConfig,
    /// Inputs for this tick, keyed by controlled actor
    pub inputs: &'a BTreeMap<ActorId, InputFrame>,
    /// Elapsed seconds for this tick
    pub dt: f32,
}

impl UpdateContext<'_> {
    /// Input for `id`, or an idle frame.
    #[inline]
    pub fn input(&self, id: ActorId) -> InputFrame {
        self.inputs.get(&id).copied().unwrap_or_default()
    }

    /// Terrain height plus ground offset at a position.
    #[inline]
    pub fn ground_at(&self, position: Vec3) -> f32 {
        self.terrain.height(position.x, position.z) + self.config.physics.ground_offset
    }
}

/// Run an active actor's own per-tick behavior.
pub fn update_actor(actor: &mut Actor, ctx: &UpdateContext<'_>, spawned: &mut Vec<Actor>) {
    match actor.category {
        Category::Player => update_player(actor, ctx, spawned),
        Category::Car => update_car(actor, ctx, spawned),
        Category::Npc | Category::Others => update_creature(actor, ctx),
        Category::Projectile => update_projectile(actor, ctx.dt),
        Category::Ammo | Category::Structure => {}
    }
    actor.position = sanitize(actor.position);
}

fn update_player(actor: &mut Actor, ctx: &UpdateContext<'_>, spawned: &mut Vec<Actor>) {
    let dt = ctx.dt;
    let input = ctx.input(actor.id);

    if let Some(loadout) = actor.loadout.as_mut() {
        loadout.update(dt);
        if actor.riding.is_none() {
            if let Some(slot) = input.slot_selected() {
                loadout.select(slot);
            }
        }
    }

    // The vehicle carries its rider and reads this input itself
    if actor.riding.is_some() {
        return;
    }

    let (id, origin, front) = (actor.id, actor.position + actor.front * PLAYER_MUZZLE, actor.front);
    if let Some(weapon) = actor.weapon_mut() {
        if input.reload_pressed() {
            weapon.reload();
        }
        if input.fire_pressed() || (input.fire_held() && weapon.auto_fire()) {
            weapon.discharge(origin, front, id, spawned);
        }
    }

    if let Some(locomotion) = actor.locomotion.as_mut() {
        locomotion.step(input.locomotion_mode(), &ctx.config.locomotion, dt);
        actor.position += locomotion.displacement(input.directions(), actor.front);
    }

    let ground = ctx.ground_at(actor.position);
    if let Some(vertical) = actor.vertical.as_mut() {
        if input.jump_pressed() {
            vertical.trigger_jump(ctx.config.physics.jump_velocity);
        }
        actor.position.y = vertical.step(actor.position.y, ground, dt);
    }
}

fn update_car(actor: &mut Actor, ctx: &UpdateContext<'_>, spawned: &mut Vec<Actor>) {
    let dt = ctx.dt;
    let config = &ctx.config.vehicle;
    let Some(vehicle) = actor.vehicle.as_mut() else {
        return;
    };

    let control = vehicle.rider().map(|rider| ctx.input(rider));
    let engine = vehicle.drive(control.as_ref(), config, dt);
    let drift = vehicle.drift(config.friction, dt);
    vehicle.update_tilt(actor.position, engine, ctx.terrain, ctx.config.physics.ground_offset);

    actor.front = vehicle.heading();
    actor.velocity = actor.front * vehicle.speed();
    actor.position += engine + drift;

    let origin = actor.position + actor.front * CAR_MUZZLE;
    if let Some(weapon) = vehicle.weapon_mut() {
        weapon.update(dt);
        if let Some(input) = control {
            if input.reload_pressed() {
                weapon.reload();
            }
            if input.fire_pressed() || (input.fire_held() && weapon.auto_fire()) {
                weapon.discharge(origin, actor.front, actor.id, spawned);
            }
        }
    }

    let ground = ctx.ground_at(actor.position);
    if let Some(vertical) = actor.vertical.as_mut() {
        actor.position.y = vertical.step(actor.position.y, ground, dt);
    }
}

fn update_creature(actor: &mut Actor, ctx: &UpdateContext<'_>) {
    let dt = ctx.dt;
    // Knockback only; steering belongs to whatever AI sits above
    actor.position += actor.velocity * dt;
    actor.velocity -= actor.velocity * (ctx.config.combat.knockback_friction * dt).min(1.0);
    actor.velocity = sanitize(actor.velocity);

    let ground = ctx.ground_at(actor.position);
    if let Some(vertical) = actor.vertical.as_mut() {
        actor.position.y = vertical.step(actor.position.y, ground, dt);
    }
}

fn update_projectile(actor: &mut Actor, dt: f32) {
    if let Some(info) = actor.projectile.as_mut() {
        info.lifetime -= dt;
        if info.lifetime <= 0.0 {
            actor.active = false;
            actor.to_delete = true;
            return;
        }
    }
    actor.position += actor.velocity * dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::terrain::FlatTerrain;
    use crate::game::actor::Loadout;
    use crate::game::physics::VerticalMode;
    use crate::game::weapon::Firearm;
    use slotmap::SlotMap;

    const DT: f32 = 1.0 / 60.0;

    fn ids(n: usize) -> Vec<ActorId> {
        let mut map: SlotMap<ActorId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn ctx<'a>(
        terrain: &'a FlatTerrain,
        config: &'a SimConfig,
        inputs: &'a BTreeMap<ActorId, InputFrame>,
    ) -> UpdateContext<'a> {
        UpdateContext {
            terrain,
            config,
            inputs,
            dt: DT,
        }
    }

    fn player(id: ActorId) -> Actor {
        let mut actor = Actor::player(
            Vec3::new(0.0, 5.0, 0.0),
            9.8,
            Loadout::new(Box::new(Firearm::pistol()), Some(Box::new(Firearm::knife()))),
        );
        actor.id = id;
        actor
    }

    #[test]
    fn test_player_settles_then_walks() {
        let id = ids(1)[0];
        let terrain = FlatTerrain::new(1.0);
        let config = SimConfig::default();
        let mut spawned = Vec::new();
        let mut actor = player(id);

        let idle = BTreeMap::new();
        for _ in 0..300 {
            update_actor(&mut actor, &ctx(&terrain, &config, &idle), &mut spawned);
        }
        assert_eq!(actor.position.y, 1.0);
        assert_eq!(actor.vertical.as_ref().unwrap().mode(), VerticalMode::Idle);

        let walk = BTreeMap::from([(id, InputFrame::with_movement(0, 1))]);
        for _ in 0..60 {
            update_actor(&mut actor, &ctx(&terrain, &config, &walk), &mut spawned);
        }
        assert!(actor.position.z < -1.0, "walked along -Z");
        assert_eq!(actor.position.y, 1.0);
    }

    #[test]
    fn test_player_fires_and_switches() {
        let id = ids(1)[0];
        let terrain = FlatTerrain::new(0.0);
        let config = SimConfig::default();
        let mut spawned = Vec::new();
        let mut actor = player(id);

        let fire = BTreeMap::from([(id, InputFrame::new().with_flags(InputFrame::FLAG_FIRE_PRESSED))]);
        update_actor(&mut actor, &ctx(&terrain, &config, &fire), &mut spawned);
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].projectile.unwrap().source, id);

        // Held fire does not repeat a semi-automatic weapon
        let held = BTreeMap::from([(id, InputFrame::new().with_flags(InputFrame::FLAG_FIRE_HELD))]);
        for _ in 0..10 {
            update_actor(&mut actor, &ctx(&terrain, &config, &held), &mut spawned);
        }
        assert_eq!(spawned.len(), 1);

        let swap = BTreeMap::from([(id, InputFrame::new().with_flags(InputFrame::FLAG_SLOT_SECONDARY))]);
        update_actor(&mut actor, &ctx(&terrain, &config, &swap), &mut spawned);
        assert_eq!(actor.weapon().map(|w| w.name()), Some("Knife"));

        update_actor(&mut actor, &ctx(&terrain, &config, &fire), &mut spawned);
        assert!(actor.weapon().unwrap().is_melee_attacking());
        assert_eq!(spawned.len(), 1);
    }

    #[test]
    fn test_jump_from_ground() {
        let id = ids(1)[0];
        let terrain = FlatTerrain::new(0.0);
        let config = SimConfig::default();
        let mut spawned = Vec::new();
        let mut actor = player(id);
        let idle = BTreeMap::new();
        for _ in 0..300 {
            update_actor(&mut actor, &ctx(&terrain, &config, &idle), &mut spawned);
        }

        let jump = BTreeMap::from([(id, InputFrame::new().with_flags(InputFrame::FLAG_JUMP))]);
        update_actor(&mut actor, &ctx(&terrain, &config, &jump), &mut spawned);
        assert!(actor.position.y > 0.0);
        for _ in 0..120 {
            update_actor(&mut actor, &ctx(&terrain, &config, &idle), &mut spawned);
        }
        assert_eq!(actor.position.y, 0.0);
    }

    #[test]
    fn test_creature_knockback_slides_and_stops() {
        let terrain = FlatTerrain::new(0.0);
        let config = SimConfig::default();
        let inputs = BTreeMap::new();
        let mut spawned = Vec::new();
        let mut npc = Actor::npc(Vec3::ZERO, 9.8);
        npc.velocity = Vec3::new(6.0, 0.0, 0.0);

        for _ in 0..600 {
            update_actor(&mut npc, &ctx(&terrain, &config, &inputs), &mut spawned);
        }
        assert!(npc.position.x > 3.0 && npc.position.x < 6.0);
        assert!(npc.velocity.x < 0.01);
        assert_eq!(npc.position.y, 0.0);
    }

    #[test]
    fn test_projectile_flies_then_expires() {
        let source = ids(1)[0];
        let mut shot = Actor::projectile(Vec3::ZERO, Vec3::X, 30.0, 0.05, source, 5, 0.1);
        let terrain = FlatTerrain::new(0.0);
        let config = SimConfig::default();
        let inputs = BTreeMap::new();
        let mut spawned = Vec::new();

        update_actor(&mut shot, &ctx(&terrain, &config, &inputs), &mut spawned);
        assert!((shot.position.x - 0.5).abs() < 1e-5);
        assert!(shot.active);

        for _ in 0..10 {
            update_actor(&mut shot, &ctx(&terrain, &config, &inputs), &mut spawned);
        }
        assert!(!shot.active);
        assert!(shot.to_delete);
    }

    #[test]
    fn test_bound_car_drives_and_fires() {
        let all = ids(2);
        let (car_id, rider) = (all[0], all[1]);
        let mut car = Actor::car(Vec3::ZERO, Some(Box::new(Firearm::submachine_gun())));
        car.id = car_id;
        car.vehicle.as_mut().unwrap().bind(rider);

        let terrain = FlatTerrain::new(0.0);
        let config = SimConfig::default();
        let mut spawned = Vec::new();
        let inputs = BTreeMap::from([(
            rider,
            InputFrame::with_movement(0, 1).with_flags(InputFrame::FLAG_FIRE_HELD),
        )]);
        for _ in 0..60 {
            update_actor(&mut car, &ctx(&terrain, &config, &inputs), &mut spawned);
        }
        assert!(car.position.z < -5.0);
        assert!(spawned.len() > 5, "auto weapon keeps firing while held");
        assert!(spawned.iter().all(|p| p.projectile.unwrap().source == car_id));
        let ammo = car.vehicle.as_ref().unwrap().weapon().unwrap().mag_rounds();
        assert_eq!(ammo, 50 - spawned.len() as i32);
    }

    #[test]
    fn test_unbound_car_ignores_input() {
        let all = ids(2);
        let mut car = Actor::car(Vec3::ZERO, None);
        car.id = all[0];
        let terrain = FlatTerrain::new(0.0);
        let config = SimConfig::default();
        let mut spawned = Vec::new();
        let inputs = BTreeMap::from([(all[0], InputFrame::with_movement(0, 1))]);
        for _ in 0..30 {
            update_actor(&mut car, &ctx(&terrain, &config, &inputs), &mut spawned);
        }
        assert_eq!(car.position, Vec3::ZERO);
    }
}
