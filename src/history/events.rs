//! Events and history logging

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{NationId, RegionId};
use crate::history::world::WorldState;

/// A historical event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub tick: u32,
    pub event_type: EventType,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    NationFounded { nation: NationId, capital: RegionId },
    Expansion {
        nation: NationId,
        region: RegionId,
        previous: Option<NationId>,
    },
    NationDestroyed { nation: NationId },
}

impl EventType {
    pub fn nations(&self) -> Vec<NationId> {
        match self {
            EventType::NationFounded { nation, .. } | EventType::NationDestroyed { nation } => vec![*nation],
            EventType::Expansion { nation, previous, .. } => {
                std::iter::once(*nation).chain(*previous).collect()
            }
        }
    }
}

/// Something that may happen to the world on a tick.
///
/// `probability` is a relative weight against the other registered events.
/// After an event is picked, `init_execution` makes its random choices and
/// `execute` applies them.
pub trait GameEvent {
    fn name(&self) -> &'static str;

    fn probability(&mut self, world: &WorldState) -> u32;

    /// Returns false when there is nothing to execute
    fn init_execution(&mut self, world: &WorldState, rng: &mut dyn RngCore) -> bool;

    fn execute(&mut self, world: &mut WorldState) -> Result<Option<(EventType, String)>>;
}

/// The complete history log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    pub events: Vec<Event>,
    next_event_id: u32,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event_type: EventType, tick: u32, message: impl Into<String>) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;

        self.events.push(Event {
            id,
            tick,
            event_type,
            message: message.into(),
        });

        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_tick(&self, tick: u32) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    pub fn events_for_nation(&self, nation: NationId) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.event_type.nations().contains(&nation))
    }

    pub fn count_expansions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.event_type, EventType::Expansion { .. }))
            .count()
    }
}
