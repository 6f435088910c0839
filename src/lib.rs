//! # Skirmish Core
//!
//! Real-time entity simulation for Skirmish: players, NPCs, cars,
//! projectiles, pickups and static structures on a height-field terrain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SKIRMISH CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── math.rs     - Vector helpers, hit angles                │
//! │  └── terrain.rs  - Height query collaborator                 │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── actor.rs    - Actor record and categories               │
//! │  ├── registry.rs - Actor collection, update driver           │
//! │  ├── behavior.rs - Per-category movement                     │
//! │  ├── physics.rs  - Jump/fall state machine                   │
//! │  ├── locomotion.rs - Walk/sprint/crouch/slide                │
//! │  ├── vehicle.rs  - Cars and riders                           │
//! │  ├── weapon.rs   - Firearms and melee                        │
//! │  ├── collision.rs- Box and segment tests                     │
//! │  ├── combat.rs   - Collision rules, projectile hits          │
//! │  ├── events.rs   - Presentation signals                      │
//! │  └── tick.rs     - World orchestration                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tick Pipeline
//!
//! Each call to [`World::tick`] runs, in order:
//! 1. Store positions, mount/dismount, per-category updates
//! 2. Pairwise collision rules, then projectile hits, then riders are
//!    re-seated on their vehicles
//! 3. Removal of actors flagged for deletion
//!
//! Rendering, audio and input polling live outside the crate. The world
//! hands out [`RenderView`]s and [`GameEvent`]s instead.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

pub use game::{
    Actor, ActorId, Category, GameEvent, GameEventData, HudSnapshot, InputFrame, RenderView,
    SimConfig, SimError, TickResult, World, WorldBuilder,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal simulation rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Nominal tick duration (seconds)
pub const TICK_DT: f32 = 1.0 / TICK_RATE as f32;
