//! World history simulation
//!
//! Nations are founded on random land regions and spread over the map one
//! event per tick. The resulting map hosts the election campaign.

pub mod events;
pub mod nation;
pub mod output;
pub mod simulation;
pub mod systems;
pub mod world;

pub use events::{Event, EventType, GameEvent, HistoryLog};
pub use nation::Nation;
pub use output::SimulationOutput;
pub use simulation::{simulate, CampaignRun, WorldSimulation};
pub use systems::NationExpansionEvent;
pub use world::WorldState;
