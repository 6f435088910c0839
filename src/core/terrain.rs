//! Terrain Height Collaborator
//!
//! The simulation only ever asks the terrain one question: how high is the
//! ground at a planar coordinate. Anything answering that can be plugged in.

use std::fmt;

/// Height query over planar (x, z) coordinates.
pub trait Terrain: Send + Sync {
    /// Ground height at `(x, z)`.
    fn height(&self, x: f32, z: f32) -> f32;
}

/// Terrain at a constant height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatTerrain {
    /// Height everywhere
    pub height: f32,
}

impl FlatTerrain {
    /// Create flat terrain at `height`.
    pub const fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Terrain for FlatTerrain {
    #[inline]
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// Terrain backed by a closure, mostly for scripted scenes and tests.
pub struct HeightFn<F>(pub F);

impl<F> Terrain for HeightFn<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    #[inline]
    fn height(&self, x: f32, z: f32) -> f32 {
        (self.0)(x, z)
    }
}

impl<F> fmt::Debug for HeightFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HeightFn(..)")
    }
}
