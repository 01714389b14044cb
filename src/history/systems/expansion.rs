//! Territory expansion - a nation absorbs an unclaimed neighbouring region

use rand::{Rng, RngCore};

use crate::core::error::Result;
use crate::core::types::{NationId, RegionId};
use crate::history::events::{EventType, GameEvent};
use crate::history::world::WorldState;

/// Weighted by the number of unclaimed land regions next to any nation,
/// so expansion slows down as the map fills up.
#[derive(Clone, Debug, Default)]
pub struct NationExpansionEvent {
    candidates: Vec<RegionId>,
    target: Option<(NationId, RegionId)>,
}

impl NationExpansionEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Region and nation chosen by the last `init_execution`
    pub fn target(&self) -> Option<(NationId, RegionId)> {
        self.target
    }
}

impl GameEvent for NationExpansionEvent {
    fn name(&self) -> &'static str {
        "Nation Expansion"
    }

    fn probability(&mut self, world: &WorldState) -> u32 {
        self.candidates = world.expansion_candidates();
        self.candidates.len() as u32
    }

    fn init_execution(&mut self, world: &WorldState, rng: &mut dyn RngCore) -> bool {
        self.target = None;
        if self.candidates.is_empty() {
            return false;
        }

        let region = self.candidates[rng.gen_range(0..self.candidates.len())];
        let nations = world.adjacent_nations(region);
        if nations.is_empty() {
            return false;
        }
        let nation = nations[rng.gen_range(0..nations.len())];

        self.target = Some((nation, region));
        true
    }

    fn execute(&mut self, world: &mut WorldState) -> Result<Option<(EventType, String)>> {
        let Some((nation, region)) = self.target.take() else {
            return Ok(None);
        };

        let previous = world.capture_region(nation, region)?;
        self.candidates.clear();

        let nation_name = world.nation(nation).map(|n| n.name.as_str()).unwrap_or("?");
        let region_name = world.map.region(region).map(|r| r.name.as_str()).unwrap_or("?");
        let message = format!(
            "The nation {nation_name} has expanded. It has called its new province {region_name}"
        );

        tracing::info!(nation = %nation, region = %region, "nation expanded");

        Ok(Some((
            EventType::Expansion {
                nation,
                region,
                previous,
            },
            message,
        )))
    }
}
