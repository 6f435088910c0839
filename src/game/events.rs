//! Game Events
//!
//! Presentation signals raised during a tick. The simulation never draws
//! or plays anything itself; HUD, camera effects and audio react to these.

use serde::{Deserialize, Serialize};

use crate::game::actor::{ActorId, Category};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Deaths first
    ActorDowned = 0,
    /// Then hits
    Hit = 1,
    /// Then pickups
    Pickup = 2,
    /// Then occupancy changes
    Vehicle = 3,
    /// Then wave progress
    Wave = 4,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A player or NPC took a directional hit
    HitFeedback {
        target: ActorId,
        /// Shooter, if it still exists
        source: Option<ActorId>,
        angle_degrees: f32,
    },

    /// At least one damaging hit landed this tick
    HitMarker { angle_degrees: f32 },

    /// Actor health reached zero and it went inactive
    ActorDowned { id: ActorId, category: Category },

    /// Player picked up ammo
    AmmoCollected {
        player: ActorId,
        rounds: i32,
        total_rounds: i32,
    },

    /// Rider bound to a vehicle
    VehicleMounted { vehicle: ActorId, rider: ActorId },

    /// Rider released from a vehicle
    VehicleDismounted { vehicle: ActorId, rider: ActorId },

    /// Live enemy count reached zero
    WaveCleared,
}

impl GameEventData {
    /// Processing priority for this kind of event.
    pub fn priority(&self) -> EventPriority {
        match self {
            GameEventData::ActorDowned { .. } => EventPriority::ActorDowned,
            GameEventData::HitFeedback { .. } | GameEventData::HitMarker { .. } => EventPriority::Hit,
            GameEventData::AmmoCollected { .. } => EventPriority::Pickup,
            GameEventData::VehicleMounted { .. } | GameEventData::VehicleDismounted { .. } => {
                EventPriority::Vehicle
            }
            GameEventData::WaveCleared => EventPriority::Wave,
        }
    }

    /// Actor the event is about (for tie-breaking).
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            GameEventData::HitFeedback { target, .. } => Some(*target),
            GameEventData::ActorDowned { id, .. } => Some(*id),
            GameEventData::AmmoCollected { player, .. } => Some(*player),
            GameEventData::VehicleMounted { rider, .. } => Some(*rider),
            GameEventData::VehicleDismounted { rider, .. } => Some(*rider),
            GameEventData::HitMarker { .. } | GameEventData::WaveCleared => None,
        }
    }
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,

    /// Processing priority
    pub priority: EventPriority,

    /// Actor involved (for tie-breaking)
    pub actor: Option<ActorId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        Self {
            tick,
            priority: data.priority(),
            actor: data.actor(),
            data,
        }
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.priority == other.priority && self.actor == other.actor
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then actor
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.actor.cmp(&other.actor))
    }
}

/// Event buffer for one tick.
#[derive(Debug, Default)]
pub struct EventLog {
    tick: u64,
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Create an empty log stamped with `tick`.
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            events: Vec::new(),
        }
    }

    /// Tick stamped on pushed events.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Record an event.
    pub fn push(&mut self, data: GameEventData) {
        self.events.push(GameEvent::new(self.tick, data));
    }

    /// Events recorded so far, in push order.
    #[inline]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain the log in processing order. The sort is stable, so events that
    /// compare equal keep their push order.
    pub fn take(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.sort();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_event_ordering() {
        let mut ids: SlotMap<ActorId, ()> = SlotMap::with_key();
        let id1 = ids.insert(());
        let id2 = ids.insert(());

        let downed1 = GameEvent::new(10, GameEventData::ActorDowned { id: id1, category: Category::Npc });
        let pickup = GameEvent::new(
            10,
            GameEventData::AmmoCollected {
                player: id1,
                rounds: 30,
                total_rounds: 70,
            },
        );
        let downed2 = GameEvent::new(10, GameEventData::ActorDowned { id: id2, category: Category::Npc });

        // Same tick, but downed < pickup
        assert!(downed1 < pickup);

        // Same tick and priority, insertion order of ids breaks the tie
        assert!(downed1 < downed2);
    }

    #[test]
    fn test_log_take_sorts_and_drains() {
        let mut ids: SlotMap<ActorId, ()> = SlotMap::with_key();
        let id = ids.insert(());

        let mut log = EventLog::new(3);
        log.push(GameEventData::WaveCleared);
        log.push(GameEventData::HitMarker { angle_degrees: 12.0 });
        log.push(GameEventData::ActorDowned { id, category: Category::Npc });
        assert_eq!(log.events().len(), 3);

        let events = log.take();
        assert!(log.events().is_empty());
        assert!(events.iter().all(|e| e.tick == 3));
        assert!(matches!(events[0].data, GameEventData::ActorDowned { .. }));
        assert!(matches!(events[1].data, GameEventData::HitMarker { .. }));
        assert!(matches!(events[2].data, GameEventData::WaveCleared));
    }
}
