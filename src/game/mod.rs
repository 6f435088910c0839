//! Game Logic Module
//!
//! All simulation code: actors, movement, collision and combat.
//!
//! ## Module Structure
//!
//! - `input`: Per-tick control input
//! - `actor`: Actor record, categories, handles
//! - `registry`: Actor collection and per-tick update driver
//! - `behavior`: Per-category movement strategies
//! - `physics`: Jump/fall state machine
//! - `locomotion`: Walk, sprint, crouch and slide accumulators
//! - `vehicle`: Car driving, tilt and rider binding
//! - `weapon`: Firearms and melee weapons
//! - `collision`: Box overlap and swept segment tests
//! - `combat`: Pairwise collision rules and projectile hits
//! - `events`: Presentation signals raised during a tick
//! - `tick`: World orchestration
//! - `config`: Tunables
//! - `error`: Error type

pub mod actor;
pub mod behavior;
pub mod collision;
pub mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod locomotion;
pub mod physics;
pub mod registry;
pub mod tick;
pub mod vehicle;
pub mod weapon;

// Re-export key types
pub use actor::{Actor, ActorId, Category, Loadout};
pub use collision::Aabb;
pub use config::SimConfig;
pub use error::SimError;
pub use events::{GameEvent, GameEventData};
pub use input::InputFrame;
pub use registry::{EntityRegistry, RenderView};
pub use tick::{HudSnapshot, TickResult, World, WorldBuilder};
pub use weapon::{Firearm, Weapon};
