//! Combat Resolution
//!
//! Runs once per tick after movement. Two passes over the registry:
//!
//! 1. Actor vs actor: every ordered pair of distinct active actors whose
//!    boxes overlap is matched against the category-pair rule table. The
//!    first matching rule resolves the pair and ends the inner scan, so an
//!    actor resolves against at most one partner per tick. Overlaps that
//!    match no rule fall through untouched and the scan goes on.
//! 2. Actor vs projectile: every active non-projectile actor is tested
//!    against every active projectile it did not fire, by swept segment and
//!    by box at the projectile's current position.
//!
//! Resolution only mutates actor fields and flags. The collection itself is
//! never restructured here.

use tracing::{debug, info, warn};

use crate::core::math::hit_angle_degrees;
use crate::game::actor::{Actor, Category};
use crate::game::config::CombatConfig;
use crate::game::events::{EventLog, GameEventData};
use crate::game::registry::EntityRegistry;

/// What the collision pass produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollisionOutcome {
    /// At least one damaging hit landed
    pub damaging: bool,
    /// Most recent hit angle in degrees
    pub hit_angle: f32,
}

/// Resolve every collision for this tick.
///
/// Returns whether any damaging hit occurred; a `HitMarker` event carrying
/// the last hit angle is raised if so.
pub fn check_for_collision(
    registry: &mut EntityRegistry,
    config: &CombatConfig,
    log: &mut EventLog,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    resolve_actor_pairs(registry, config, log, &mut outcome);
    resolve_projectiles(registry, log, &mut outcome);

    if outcome.damaging {
        log.push(GameEventData::HitMarker {
            angle_degrees: outcome.hit_angle,
        });
    }
    outcome
}

// =============================================================================
// Actor vs actor
// =============================================================================

fn resolve_actor_pairs(
    registry: &mut EntityRegistry,
    config: &CombatConfig,
    log: &mut EventLog,
    outcome: &mut CollisionOutcome,
) {
    let n = registry.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (a, b) = registry.pair_mut(i, j);
            if !a.active {
                break;
            }
            if !b.active || !a.aabb().overlaps(&b.aabb()) {
                continue;
            }
            if resolve_pair(a, b, config, log, outcome) {
                break;
            }
        }
    }
}

/// Apply the first matching category-pair rule. Returns false if no rule
/// matched.
fn resolve_pair(
    a: &mut Actor,
    b: &mut Actor,
    config: &CombatConfig,
    log: &mut EventLog,
    outcome: &mut CollisionOutcome,
) -> bool {
    use Category::*;

    match (a.category, b.category) {
        (Player, Car) => {
            if a.riding != Some(b.id) {
                a.rollback();
            }
            debug!(player = ?a.id, car = ?b.id, "player hit car");
        }

        (Player, Ammo) => {
            if let Some(weapon) = a.weapon_mut() {
                let total = weapon.total_rounds().saturating_add(config.ammo_bonus);
                weapon.set_total_rounds(total);
                log.push(GameEventData::AmmoCollected {
                    player: a.id,
                    rounds: config.ammo_bonus,
                    total_rounds: total,
                });
            }
            b.active = false;
            debug!(player = ?a.id, ammo = ?b.id, "ammo collected");
        }

        (x, y) if x.is_mobile() && y.is_creature() => {
            a.rollback();
            b.rollback();

            let damage = match x {
                Player => a
                    .weapon()
                    .filter(|w| w.is_melee_attacking())
                    .map_or(0, |w| w.damage()),
                _ => {
                    let speed = a.vehicle_speed();
                    b.velocity += a.front * speed;
                    ram_damage(b.health, speed)
                }
            };

            let angle = hit_angle_degrees(a.front, b.front);
            outcome.hit_angle = angle;
            if damage > 0 {
                outcome.damaging = true;
                if b.apply_damage(damage) {
                    downed(b, log);
                }
            }
            debug!(mover = ?a.id, target = ?b.id, damage, angle, "mobile hit creature");
        }

        (x, y) if x.is_creature() && y.is_creature() => {
            a.rollback();
            b.rollback();
            debug!(a = ?a.id, b = ?b.id, "creatures collided");
        }

        (x, Structure) if x.is_solid_mover() => {
            a.rollback();
            if let Some(vehicle) = a.vehicle.as_mut() {
                // Bounce: engine speed turns into a backward impulse
                let speed = vehicle.speed();
                vehicle.add_impulse(-a.front * speed);
                vehicle.stop();
            }
            debug!(mover = ?a.id, structure = ?b.id, "hit structure");
        }

        _ => return false,
    }
    true
}

// =============================================================================
// Actor vs projectile
// =============================================================================

fn resolve_projectiles(registry: &mut EntityRegistry, log: &mut EventLog, outcome: &mut CollisionOutcome) {
    let n = registry.len();
    for i in 0..n {
        let target = &registry.actors()[i];
        if !target.active || target.category == Category::Projectile {
            continue;
        }

        for j in 0..n {
            if i == j {
                continue;
            }
            let candidate = &registry.actors()[j];
            let Some(info) = candidate.projectile else {
                continue;
            };
            if !candidate.active || info.source == registry.actors()[i].id {
                continue;
            }
            let source_front = registry.get(info.source).map(|s| s.front);

            let (target, projectile) = registry.pair_mut(i, j);
            let target_box = target.aabb();
            let swept = target_box.intersects_segment(projectile.previous_position, projectile.position);
            let resting = target_box.overlaps(&projectile.aabb());
            if !(swept || resting) {
                continue;
            }

            projectile.active = false;
            if target.apply_damage(info.damage) {
                downed(target, log);
            }
            debug!(
                target = ?target.id,
                projectile = ?projectile.id,
                damage = info.damage,
                health = target.health,
                swept,
                resting,
                "projectile hit"
            );

            if target.category.shows_hit_feedback() {
                let reference = source_front.unwrap_or_else(|| {
                    warn!(projectile = ?projectile.id, "projectile source is gone, using its heading");
                    projectile.front
                });
                let angle = hit_angle_degrees(target.front, reference);
                outcome.hit_angle = angle;
                outcome.damaging = true;
                log.push(GameEventData::HitFeedback {
                    target: target.id,
                    source: source_front.map(|_| info.source),
                    angle_degrees: angle,
                });
            }
            break;
        }
    }
}

/// Health lost when rammed at `speed`.
///
/// Speed comes off in float and the remaining health is truncated, so a
/// slow ram still costs a point. `abs` keeps reversing from healing.
fn ram_damage(health: i32, speed: f32) -> i32 {
    let remaining = (health as f32 - speed.abs()) as i32;
    health.saturating_sub(remaining).max(0)
}

fn downed(actor: &Actor, log: &mut EventLog) {
    info!(id = ?actor.id, category = ?actor.category, "actor downed");
    log.push(GameEventData::ActorDowned {
        id: actor.id,
        category: actor.category,
    });
}
