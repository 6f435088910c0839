//! Actor Records
//!
//! Every simulated entity is an `Actor`: a flat record of shared state plus
//! optional capabilities (vertical physics, locomotion, vehicle, projectile
//! payload, weapon loadout). The category tag selects which rules and
//! movement strategy apply.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::math::REFERENCE_FORWARD;
use crate::game::collision::Aabb;
use crate::game::locomotion::LocomotionState;
use crate::game::physics::VerticalPhysics;
use crate::game::vehicle::VehicleState;
use crate::game::weapon::Weapon;

slotmap::new_key_type! {
    /// Generational actor handle. A handle to a removed actor never resolves
    /// again, even if its slot is reused.
    pub struct ActorId;
}

/// Default health for new actors.
pub const DEFAULT_HEALTH: i32 = 100;

// =============================================================================
// Categories
// =============================================================================

/// Actor category tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Npc,
    Car,
    Projectile,
    Ammo,
    Structure,
    Others,
}

impl Category {
    /// Player-driven movers: {Player, Car}.
    #[inline]
    pub fn is_mobile(self) -> bool {
        matches!(self, Category::Player | Category::Car)
    }

    /// Self-driven movers: {NPC, Others}.
    #[inline]
    pub fn is_creature(self) -> bool {
        matches!(self, Category::Npc | Category::Others)
    }

    /// Anything that is blocked by structures.
    #[inline]
    pub fn is_solid_mover(self) -> bool {
        self.is_mobile() || self.is_creature()
    }

    /// Targets that raise directional hit feedback when shot.
    #[inline]
    pub fn shows_hit_feedback(self) -> bool {
        matches!(self, Category::Player | Category::Npc)
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Payload carried by projectile actors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileInfo {
    /// Actor that fired it. Weak: the source may already be gone.
    pub source: ActorId,
    /// Health removed on hit
    pub damage: i32,
    /// Seconds left before expiry
    pub lifetime: f32,
}

/// Two weapon slots and a selection.
#[derive(Debug, Default)]
pub struct Loadout {
    slots: [Option<Box<dyn Weapon>>; 2],
    current: usize,
}

impl Loadout {
    /// Create a loadout with the primary slot selected.
    pub fn new(primary: Box<dyn Weapon>, secondary: Option<Box<dyn Weapon>>) -> Self {
        Self {
            slots: [Some(primary), secondary],
            current: 0,
        }
    }

    /// Selected slot index.
    #[inline]
    pub fn current_slot(&self) -> usize {
        self.current
    }

    /// Select a slot. Empty or out-of-range slots are ignored.
    pub fn select(&mut self, slot: usize) -> bool {
        match self.slots.get(slot) {
            Some(Some(_)) => {
                self.current = slot;
                true
            }
            _ => false,
        }
    }

    /// Selected weapon.
    pub fn current(&self) -> Option<&dyn Weapon> {
        self.slots[self.current].as_deref()
    }

    /// Selected weapon, mutably.
    pub fn current_mut(&mut self) -> Option<&mut (dyn Weapon + 'static)> {
        self.slots[self.current].as_deref_mut()
    }

    /// Advance every held weapon's timers.
    pub fn update(&mut self, dt: f32) {
        for weapon in self.slots.iter_mut().flatten() {
            weapon.update(dt);
        }
    }
}

// =============================================================================
// Actor
// =============================================================================

/// A simulated entity.
#[derive(Debug)]
pub struct Actor {
    /// Identity, assigned by the registry on add
    pub id: ActorId,
    /// Category tag
    pub category: Category,
    /// Current world position
    pub position: Vec3,
    /// Position at the start of the current tick (rollback target)
    pub previous_position: Vec3,
    /// Local box offsets, fixed at creation
    box_min: Vec3,
    box_max: Vec3,
    /// Facing direction
    pub front: Vec3,
    /// Linear velocity (knockback for creatures, flight for projectiles)
    pub velocity: Vec3,
    /// Health; the actor goes inactive at 0 or below
    pub health: i32,
    /// Inactive actors are skipped by collision and combat
    pub active: bool,
    /// Removed at the next clean-up
    pub to_delete: bool,

    /// Vertical state machine for grounded actors
    pub vertical: Option<VerticalPhysics>,
    /// Layered ground movement (players)
    pub locomotion: Option<LocomotionState>,
    /// Vehicle controller (cars)
    pub vehicle: Option<VehicleState>,
    /// Projectile payload
    pub projectile: Option<ProjectileInfo>,
    /// Carried weapons
    pub loadout: Option<Loadout>,
    /// Vehicle this actor currently rides
    pub riding: Option<ActorId>,
}

impl Actor {
    /// Create a bare actor. Box offsets are normalized so min <= max.
    pub fn new(category: Category, position: Vec3, box_min: Vec3, box_max: Vec3) -> Self {
        Self {
            id: ActorId::default(),
            category,
            position,
            previous_position: position,
            box_min: box_min.min(box_max),
            box_max: box_min.max(box_max),
            front: REFERENCE_FORWARD,
            velocity: Vec3::ZERO,
            health: DEFAULT_HEALTH,
            active: true,
            to_delete: false,
            vertical: None,
            locomotion: None,
            vehicle: None,
            projectile: None,
            loadout: None,
            riding: None,
        }
    }

    /// Player with locomotion, a loadout, and vertical physics that starts
    /// falling so it settles onto the terrain.
    pub fn player(position: Vec3, gravity: f32, loadout: Loadout) -> Self {
        let mut actor = Self::new(
            Category::Player,
            position,
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        );
        actor.vertical = Some(VerticalPhysics::falling(gravity));
        actor.locomotion = Some(LocomotionState::new());
        actor.loadout = Some(loadout);
        actor
    }

    /// Enemy creature.
    pub fn npc(position: Vec3, gravity: f32) -> Self {
        let mut actor = Self::new(
            Category::Npc,
            position,
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        );
        actor.vertical = Some(VerticalPhysics::falling(gravity));
        actor
    }

    /// Neutral creature (blocks and can be shoved, not counted as an enemy).
    pub fn other(position: Vec3, gravity: f32, half_extents: Vec3) -> Self {
        let mut actor = Self::new(Category::Others, position, -half_extents, half_extents);
        actor.vertical = Some(VerticalPhysics::falling(gravity));
        actor
    }

    /// Drivable car. Its vertical machine runs without gravity.
    pub fn car(position: Vec3, weapon: Option<Box<dyn Weapon>>) -> Self {
        let mut actor = Self::new(
            Category::Car,
            position,
            Vec3::new(-1.0, -0.5, -2.0),
            Vec3::new(1.0, 0.5, 2.0),
        );
        actor.vertical = Some(VerticalPhysics::new(0.0));
        actor.vehicle = Some(VehicleState::new(weapon));
        actor
    }

    /// Static obstacle.
    pub fn structure(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(Category::Structure, position, -half_extents, half_extents)
    }

    /// Ammo pickup.
    pub fn ammo(position: Vec3) -> Self {
        Self::new(
            Category::Ammo,
            position,
            Vec3::new(-0.25, -0.25, -0.25),
            Vec3::new(0.25, 0.25, 0.25),
        )
    }

    /// Projectile flying along `direction` at `speed`.
    pub fn projectile(
        origin: Vec3,
        direction: Vec3,
        speed: f32,
        half_extent: f32,
        source: ActorId,
        damage: i32,
        lifetime: f32,
    ) -> Self {
        let half = Vec3::splat(half_extent.abs());
        let mut actor = Self::new(Category::Projectile, origin, -half, half);
        let front = direction.try_normalize().unwrap_or(REFERENCE_FORWARD);
        actor.front = front;
        actor.velocity = front * speed;
        actor.projectile = Some(ProjectileInfo {
            source,
            damage,
            lifetime,
        });
        actor
    }

    /// Builder-style health override.
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Builder-style facing override.
    pub fn with_front(mut self, front: Vec3) -> Self {
        self.front = front.try_normalize().unwrap_or(REFERENCE_FORWARD);
        self
    }

    /// Local box minimum offset.
    #[inline]
    pub fn box_min(&self) -> Vec3 {
        self.box_min
    }

    /// Local box maximum offset.
    #[inline]
    pub fn box_max(&self) -> Vec3 {
        self.box_max
    }

    /// World-space box at the current position.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::at(self.position, self.box_min, self.box_max)
    }

    /// Undo this tick's movement.
    #[inline]
    pub fn rollback(&mut self) {
        self.position = self.previous_position;
    }

    /// Record the rollback target for this tick.
    #[inline]
    pub fn store_position(&mut self) {
        self.previous_position = self.position;
    }

    /// Remove health. Returns true if this took the actor from active to
    /// down (health at or below zero).
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        self.health = self.health.saturating_sub(amount.max(0));
        if self.health <= 0 && self.active {
            self.active = false;
            return true;
        }
        false
    }

    /// Weapon in hand: the loadout's current weapon.
    pub fn weapon(&self) -> Option<&dyn Weapon> {
        self.loadout.as_ref().and_then(Loadout::current)
    }

    /// Weapon in hand, mutably.
    pub fn weapon_mut(&mut self) -> Option<&mut (dyn Weapon + 'static)> {
        self.loadout.as_mut().and_then(Loadout::current_mut)
    }

    /// Current vehicle speed, zero for non-vehicles.
    #[inline]
    pub fn vehicle_speed(&self) -> f32 {
        self.vehicle.as_ref().map_or(0.0, VehicleState::speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::weapon::Firearm;

    #[test]
    fn test_category_sets() {
        use Category::*;
        let all = [Player, Npc, Car, Projectile, Ammo, Structure, Others];
        let mobile: Vec<_> = all.iter().filter(|c| c.is_mobile()).collect();
        let creature: Vec<_> = all.iter().filter(|c| c.is_creature()).collect();
        let solid: Vec<_> = all.iter().filter(|c| c.is_solid_mover()).collect();
        assert_eq!(mobile, vec![&Player, &Car]);
        assert_eq!(creature, vec![&Npc, &Others]);
        assert_eq!(solid, vec![&Player, &Npc, &Car, &Others]);
    }

    #[test]
    fn test_box_offsets_normalized() {
        let actor = Actor::new(Category::Structure, Vec3::ZERO, Vec3::ONE, -Vec3::ONE);
        assert_eq!(actor.box_min(), -Vec3::ONE);
        assert_eq!(actor.box_max(), Vec3::ONE);
        let aabb = Actor::structure(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.5)).aabb();
        assert_eq!(aabb.min, Vec3::new(1.5, -0.5, -0.5));
    }

    #[test]
    fn test_damage_deactivates_once() {
        let mut npc = Actor::npc(Vec3::ZERO, 9.8).with_health(10);
        assert!(!npc.apply_damage(5));
        assert!(npc.active);
        assert!(npc.apply_damage(5));
        assert_eq!(npc.health, 0);
        assert!(!npc.active);
        // Already down
        assert!(!npc.apply_damage(5));
        assert_eq!(npc.health, -5);
    }

    #[test]
    fn test_negative_damage_never_heals() {
        let mut npc = Actor::npc(Vec3::ZERO, 9.8);
        npc.apply_damage(-20);
        assert_eq!(npc.health, DEFAULT_HEALTH);
    }

    #[test]
    fn test_rollback() {
        let mut player = Actor::player(Vec3::ZERO, 9.8, Loadout::new(Box::new(Firearm::pistol()), None));
        player.store_position();
        player.position = Vec3::new(1.0, 0.0, 0.0);
        player.rollback();
        assert_eq!(player.position, Vec3::ZERO);
    }

    #[test]
    fn test_loadout_selection() {
        let mut loadout = Loadout::new(Box::new(Firearm::pistol()), Some(Box::new(Firearm::knife())));
        assert_eq!(loadout.current().map(|w| w.name()), Some("Pistol"));
        assert!(loadout.select(1));
        assert_eq!(loadout.current().map(|w| w.name()), Some("Knife"));
        assert!(!loadout.select(2));
        assert_eq!(loadout.current_slot(), 1);

        let mut single = Loadout::new(Box::new(Firearm::pistol()), None);
        assert!(!single.select(1));
        assert_eq!(single.current_slot(), 0);
    }
}
