//! Setup Errors
//!
//! Only construction-time failures are errors. Once ticking starts, every
//! path degrades silently instead.

use thiserror::Error;

use crate::game::actor::ActorId;

/// Errors raised while building or populating a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// No terrain handle was supplied
    #[error("terrain handle is required")]
    MissingTerrain,

    /// A configuration value is out of range
    #[error("invalid config field {field}: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// Configuration JSON could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An actor with this identity is already registered
    #[error("actor {0:?} is already registered")]
    DuplicateActor(ActorId),
}
