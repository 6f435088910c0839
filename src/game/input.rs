//! Input State
//!
//! Per-tick input for one controlled actor, already polled from whatever
//! device layer sits above the simulation. Movement axes are digital-ish
//! (`i8`, sign is all that matters for locomotion), actions are packed bits
//! split into "pressed this tick" edges and "held" levels.

use serde::{Deserialize, Serialize};

use crate::game::locomotion::{LocomotionMode, MoveDirection};

/// Input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Strafe axis: negative = left, positive = right
    pub move_x: i8,

    /// Forward axis: negative = backward, positive = forward
    pub move_y: i8,

    /// Steering axis for vehicles: negative = left, positive = right
    pub steer: i8,

    /// Action flags (packed bits), see the `FLAG_*` constants.
    pub flags: u16,
}

impl InputFrame {
    /// Jump pressed this tick
    pub const FLAG_JUMP: u16 = 0x0001;
    /// Interact (mount / dismount) pressed this tick
    pub const FLAG_INTERACT: u16 = 0x0002;
    /// Fire pressed this tick
    pub const FLAG_FIRE_PRESSED: u16 = 0x0004;
    /// Fire held
    pub const FLAG_FIRE_HELD: u16 = 0x0008;
    /// Reload pressed this tick
    pub const FLAG_RELOAD: u16 = 0x0010;
    /// Sprint held
    pub const FLAG_SPRINT: u16 = 0x0020;
    /// Crouch held
    pub const FLAG_CROUCH: u16 = 0x0040;
    /// Select primary weapon slot
    pub const FLAG_SLOT_PRIMARY: u16 = 0x0080;
    /// Select secondary weapon slot
    pub const FLAG_SLOT_SECONDARY: u16 = 0x0100;

    /// Create an idle frame.
    pub const fn new() -> Self {
        Self {
            move_x: 0,
            move_y: 0,
            steer: 0,
            flags: 0,
        }
    }

    /// Create input with movement axes.
    pub const fn with_movement(move_x: i8, move_y: i8) -> Self {
        Self {
            move_x,
            move_y,
            steer: 0,
            flags: 0,
        }
    }

    /// Builder-style flag setter.
    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }

    /// Builder-style steering setter.
    pub fn with_steer(mut self, steer: i8) -> Self {
        self.steer = steer;
        self
    }

    #[inline]
    fn has(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Check if jump was pressed this tick.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.has(Self::FLAG_JUMP)
    }

    /// Check if interact was pressed this tick.
    #[inline]
    pub fn interact_pressed(&self) -> bool {
        self.has(Self::FLAG_INTERACT)
    }

    /// Check if fire was pressed this tick.
    #[inline]
    pub fn fire_pressed(&self) -> bool {
        self.has(Self::FLAG_FIRE_PRESSED)
    }

    /// Check if fire is held.
    #[inline]
    pub fn fire_held(&self) -> bool {
        self.has(Self::FLAG_FIRE_HELD)
    }

    /// Check if reload was pressed this tick.
    #[inline]
    pub fn reload_pressed(&self) -> bool {
        self.has(Self::FLAG_RELOAD)
    }

    /// Requested weapon slot change, if any. Primary wins if both are set.
    pub fn slot_selected(&self) -> Option<usize> {
        if self.has(Self::FLAG_SLOT_PRIMARY) {
            Some(0)
        } else if self.has(Self::FLAG_SLOT_SECONDARY) {
            Some(1)
        } else {
            None
        }
    }

    /// Check if input has any ground movement.
    #[inline]
    pub fn has_movement(&self) -> bool {
        self.move_x != 0 || self.move_y != 0
    }

    /// Directions requested this tick (front/back/left/right).
    pub fn directions(&self) -> impl Iterator<Item = MoveDirection> {
        let forward = match self.move_y.signum() {
            1 => Some(MoveDirection::Forward),
            -1 => Some(MoveDirection::Backward),
            _ => None,
        };
        let strafe = match self.move_x.signum() {
            1 => Some(MoveDirection::Right),
            -1 => Some(MoveDirection::Left),
            _ => None,
        };
        forward.into_iter().chain(strafe)
    }

    /// Locomotion mode implied by this frame.
    ///
    /// Crouch wins over sprint; no movement at all is rest.
    pub fn locomotion_mode(&self) -> LocomotionMode {
        if self.has(Self::FLAG_CROUCH) {
            LocomotionMode::Crouch
        } else if !self.has_movement() {
            LocomotionMode::Rest
        } else if self.has(Self::FLAG_SPRINT) {
            LocomotionMode::Sprint
        } else {
            LocomotionMode::Walk
        }
    }

    /// Throttle sign for vehicles: +1 forward, -1 reverse, 0 coast.
    #[inline]
    pub fn throttle(&self) -> f32 {
        self.move_y.signum() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_frame() {
        let frame = InputFrame::new();
        assert!(!frame.has_movement());
        assert!(!frame.jump_pressed());
        assert_eq!(frame.locomotion_mode(), LocomotionMode::Rest);
        assert_eq!(frame.directions().count(), 0);
    }

    #[test]
    fn test_flags() {
        let frame = InputFrame::new().with_flags(InputFrame::FLAG_JUMP | InputFrame::FLAG_RELOAD);
        assert!(frame.jump_pressed());
        assert!(frame.reload_pressed());
        assert!(!frame.fire_pressed());
        assert!(!frame.interact_pressed());
    }

    #[test]
    fn test_directions() {
        let frame = InputFrame::with_movement(-100, 127);
        let dirs: Vec<_> = frame.directions().collect();
        assert_eq!(dirs, vec![MoveDirection::Forward, MoveDirection::Left]);
    }

    #[test]
    fn test_locomotion_mode_priority() {
        let walk = InputFrame::with_movement(0, 1);
        assert_eq!(walk.locomotion_mode(), LocomotionMode::Walk);

        let sprint = walk.with_flags(InputFrame::FLAG_SPRINT);
        assert_eq!(sprint.locomotion_mode(), LocomotionMode::Sprint);

        let crouch = sprint.with_flags(InputFrame::FLAG_CROUCH);
        assert_eq!(crouch.locomotion_mode(), LocomotionMode::Crouch);
    }

    #[test]
    fn test_slot_selection() {
        assert_eq!(InputFrame::new().slot_selected(), None);
        let both = InputFrame::new()
            .with_flags(InputFrame::FLAG_SLOT_PRIMARY | InputFrame::FLAG_SLOT_SECONDARY);
        assert_eq!(both.slot_selected(), Some(0));
    }
}
