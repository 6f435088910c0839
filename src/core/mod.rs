//! Core primitives.
//!
//! Vector helpers and the terrain collaborator. Nothing in here knows about
//! actors or game rules.

pub mod math;
pub mod terrain;

// Re-export core types
pub use math::{hit_angle_degrees, heading_from_degrees, right_of, WORLD_UP};
pub use terrain::{FlatTerrain, HeightFn, Terrain};
