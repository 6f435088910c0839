//! Vehicle Controller
//!
//! Heading from an accumulated torque angle, speed under linear friction,
//! a per-tick step cap, and a presentation-only tilt from the terrain slope.
//! Occupancy binds at most one rider; while bound, the rider's input is the
//! only control the vehicle reads.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use tracing::{info, warn};

use crate::core::math::{cap_length, heading_from_degrees, planar_distance, right_of};
use crate::core::terrain::Terrain;
use crate::game::actor::{ActorId, Category};
use crate::game::config::VehicleConfig;
use crate::game::events::{EventLog, GameEventData};
use crate::game::input::InputFrame;
use crate::game::registry::EntityRegistry;
use crate::game::weapon::Weapon;

/// Below this planar step the previous tilt is kept.
const TILT_MIN_STEP: f32 = 1e-4;

/// Controller state for one car.
#[derive(Debug)]
pub struct VehicleState {
    /// Heading offset in degrees from the reference forward
    torque: f32,
    /// Signed linear speed (units/s)
    speed: f32,
    /// Presentation pitch in degrees
    tilt: f32,
    /// Bound rider
    rider: Option<ActorId>,
    /// Knockback velocity, independent of engine speed
    external_velocity: Vec3,
    /// Mounted weapon
    weapon: Option<Box<dyn Weapon>>,
}

impl VehicleState {
    /// Create an unbound vehicle at rest.
    pub fn new(weapon: Option<Box<dyn Weapon>>) -> Self {
        Self {
            torque: 0.0,
            speed: 0.0,
            tilt: 0.0,
            rider: None,
            external_velocity: Vec3::ZERO,
            weapon,
        }
    }

    /// Heading offset in degrees.
    #[inline]
    pub fn torque(&self) -> f32 {
        self.torque
    }

    /// Signed linear speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Presentation pitch in degrees.
    #[inline]
    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Unit heading vector.
    #[inline]
    pub fn heading(&self) -> Vec3 {
        heading_from_degrees(self.torque)
    }

    /// Bound rider, if any.
    #[inline]
    pub fn rider(&self) -> Option<ActorId> {
        self.rider
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.rider.is_some()
    }

    /// Mounted weapon.
    pub fn weapon(&self) -> Option<&dyn Weapon> {
        self.weapon.as_deref()
    }

    /// Mounted weapon, mutably.
    pub fn weapon_mut(&mut self) -> Option<&mut (dyn Weapon + 'static)> {
        self.weapon.as_deref_mut()
    }

    /// Knockback velocity.
    #[inline]
    pub fn external_velocity(&self) -> Vec3 {
        self.external_velocity
    }

    /// Add a knockback impulse.
    pub fn add_impulse(&mut self, impulse: Vec3) {
        if impulse.is_finite() {
            self.external_velocity += impulse;
        }
    }

    /// Kill engine speed.
    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    pub(crate) fn bind(&mut self, rider: ActorId) {
        self.rider = Some(rider);
    }

    pub(crate) fn unbind(&mut self) -> Option<ActorId> {
        self.rider.take()
    }

    /// Advance speed and heading one tick and return the engine step.
    ///
    /// `control` is the rider's input; `None` leaves only the idle decay.
    pub fn drive(&mut self, control: Option<&InputFrame>, config: &VehicleConfig, dt: f32) -> Vec3 {
        // Friction first, every tick
        self.speed -= self.speed * (config.friction * dt).min(1.0);

        let mut accel = 0.0;
        if let Some(input) = control {
            if self.speed.abs() > config.steer_min_speed && input.steer != 0 {
                // Steering follows the direction of travel
                let dir = self.speed.signum() * f32::from(input.steer.signum());
                self.torque -= config.torque_rate * dir * dt;
            }
            accel = input.throttle() * config.engine_accel * dt;
        }

        self.speed += accel * dt;
        if !self.speed.is_finite() {
            self.speed = 0.0;
        }

        cap_length(self.heading() * self.speed * dt, config.max_step)
    }

    /// Integrate knockback velocity with linear friction and return the step.
    pub fn drift(&mut self, friction: f32, dt: f32) -> Vec3 {
        let step = self.external_velocity * dt;
        self.external_velocity -= self.external_velocity * (friction * dt).min(1.0);
        step
    }

    /// Recompute tilt from the slope toward the predicted next position.
    pub fn update_tilt(&mut self, position: Vec3, step: Vec3, terrain: &dyn Terrain, ground_offset: f32) {
        let predicted = position + step;
        let run = planar_distance(position, predicted);
        if run < TILT_MIN_STEP {
            return;
        }
        let rise = terrain.height(predicted.x, predicted.z) + ground_offset - position.y;
        self.tilt = rise.atan2(run).to_degrees();
    }
}

// =============================================================================
// Occupancy
// =============================================================================

/// Run mount and dismount transitions for every car, in registry order.
///
/// Dismount: the rider pressed interact, or the car went inactive. The rider
/// is set down beside the car. Mount: an unbound active car binds the
/// nearest active, unmounted player that pressed interact within range.
pub fn update_occupancy(
    registry: &mut EntityRegistry,
    inputs: &BTreeMap<ActorId, InputFrame>,
    config: &VehicleConfig,
    log: &mut EventLog,
) {
    let pressed = |id: ActorId| inputs.get(&id).is_some_and(InputFrame::interact_pressed);
    let cars: Vec<ActorId> = registry
        .iter()
        .filter(|a| a.category == Category::Car && a.vehicle.is_some())
        .map(|a| a.id)
        .collect();
    // Riders set down this tick may not remount on the same press
    let mut dismounted = BTreeSet::new();

    for car_id in cars {
        let Some(car) = registry.get(car_id) else {
            continue;
        };
        let car_active = car.active;
        let car_position = car.position;
        let car_front = car.front;
        let rider = car.vehicle.as_ref().and_then(VehicleState::rider);

        match rider {
            Some(rider_id) => {
                if car_active && !pressed(rider_id) && registry.contains(rider_id) {
                    continue;
                }
                if let Some(vehicle) = registry.get_mut(car_id).and_then(|c| c.vehicle.as_mut()) {
                    vehicle.unbind();
                }
                match registry.get_mut(rider_id) {
                    Some(rider) => {
                        rider.position = car_position + right_of(car_front) * config.dismount_offset;
                        rider.riding = None;
                        dismounted.insert(rider_id);
                        info!(vehicle = ?car_id, rider = ?rider_id, "vehicle dismounted");
                        log.push(GameEventData::VehicleDismounted {
                            vehicle: car_id,
                            rider: rider_id,
                        });
                    }
                    None => warn!(vehicle = ?car_id, rider = ?rider_id, "rider vanished while bound"),
                }
            }
            None if car_active => {
                let candidate = registry
                    .iter()
                    .filter(|p| {
                        p.category == Category::Player
                            && p.active
                            && p.riding.is_none()
                            && !dismounted.contains(&p.id)
                            && pressed(p.id)
                    })
                    .map(|p| (p.id, p.position.distance(car_position)))
                    .filter(|(_, distance)| *distance < config.mount_radius)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(id, _)| id);

                let Some(rider_id) = candidate else {
                    continue;
                };
                if let Some(vehicle) = registry.get_mut(car_id).and_then(|c| c.vehicle.as_mut()) {
                    vehicle.bind(rider_id);
                }
                if let Some(rider) = registry.get_mut(rider_id) {
                    rider.riding = Some(car_id);
                    rider.position = car_position;
                }
                info!(vehicle = ?car_id, rider = ?rider_id, "vehicle mounted");
                log.push(GameEventData::VehicleMounted {
                    vehicle: car_id,
                    rider: rider_id,
                });
            }
            None => {}
        }
    }
}
