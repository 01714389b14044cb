//! WorldState - the map together with the nations dividing it

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{NationId, RegionId};
use crate::history::nation::Nation;
use crate::map::world_map::WorldMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    pub map: WorldMap,
    /// Indexed by `NationId`; destroyed nations stay with no regions
    pub nations: Vec<Nation>,
    pub tick: u32,
}

impl WorldState {
    pub fn new(map: WorldMap) -> Self {
        Self {
            map,
            nations: Vec::new(),
            tick: 0,
        }
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.get(id.index())
    }

    pub fn alive_nations(&self) -> impl Iterator<Item = &Nation> {
        self.nations.iter().filter(|n| n.is_alive())
    }

    pub fn owner_of(&self, region: RegionId) -> Option<NationId> {
        self.map.region(region).and_then(|r| r.nation)
    }

    /// Found a nation on an unclaimed land region
    pub fn found_nation(&mut self, name: impl Into<String>, capital: RegionId) -> Result<NationId> {
        let region = self.map.try_region(capital)?;
        if region.is_water {
            return Err(SimError::NotLand(capital));
        }
        if let Some(owner) = region.nation {
            return Err(SimError::RegionClaimed { region: capital, owner });
        }

        let id = NationId(self.nations.len() as u32);
        self.nations.push(Nation::new(id, name, capital));
        self.capture_region(id, capital)?;
        Ok(id)
    }

    /// Transfer a land region to `nation`; returns the previous owner
    pub fn capture_region(&mut self, nation: NationId, region: RegionId) -> Result<Option<NationId>> {
        if self.nation(nation).is_none() {
            return Err(SimError::UnknownNation(nation));
        }
        let r = self.map.try_region(region)?;
        if r.is_water {
            return Err(SimError::NotLand(region));
        }
        let previous = r.nation;
        if previous == Some(nation) {
            return Ok(previous);
        }

        if let Some(region_mut) = self.map.region_mut(region) {
            region_mut.nation = Some(nation);
        }
        if let Some(old) = previous.and_then(|p| self.nations.get_mut(p.index())) {
            old.remove_region(region, &self.map);
        }
        if let Some(new) = self.nations.get_mut(nation.index()) {
            new.add_region(region, &self.map);
        }
        Ok(previous)
    }

    /// Unclaimed land regions bordering at least one owned region, ascending id
    pub fn expansion_candidates(&self) -> Vec<RegionId> {
        self.map
            .land_regions()
            .filter(|r| r.nation.is_none())
            .filter(|r| r.neighbors.iter().any(|&n| self.owner_of(n).is_some()))
            .map(|r| r.id)
            .collect()
    }

    /// Distinct owners of the regions around `region`, in neighbour order
    pub fn adjacent_nations(&self, region: RegionId) -> Vec<NationId> {
        let mut nations = Vec::new();
        if let Some(r) = self.map.region(region) {
            for owner in r.neighbors.iter().filter_map(|&n| self.owner_of(n)) {
                if !nations.contains(&owner) {
                    nations.push(owner);
                }
            }
        }
        nations
    }
}
