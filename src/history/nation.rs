//! Nation - a named group of owned land regions

use serde::{Deserialize, Serialize};

use crate::core::types::{NationId, RegionId};
use crate::map::world_map::WorldMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Nation {
    pub id: NationId,
    pub name: String,
    pub capital: RegionId,
    /// Owned regions in acquisition order
    pub regions: Vec<RegionId>,
    /// Owned regions grouped by land adjacency
    pub clusters: Vec<Vec<RegionId>>,
    pub area: f32,
}

impl Nation {
    pub fn new(id: NationId, name: impl Into<String>, capital: RegionId) -> Self {
        Self {
            id,
            name: name.into(),
            capital,
            regions: Vec::new(),
            clusters: Vec::new(),
            area: 0.0,
        }
    }

    pub fn owns(&self, region: RegionId) -> bool {
        self.regions.contains(&region)
    }

    /// A nation with no regions left has been wiped off the map
    pub fn is_alive(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn size(&self) -> usize {
        self.regions.len()
    }

    pub(crate) fn add_region(&mut self, region: RegionId, map: &WorldMap) {
        if !self.owns(region) {
            self.regions.push(region);
        }
        self.update_properties(map);
    }

    pub(crate) fn remove_region(&mut self, region: RegionId, map: &WorldMap) {
        self.regions.retain(|&r| r != region);
        if self.capital == region {
            if let Some(&next) = self.regions.first() {
                self.capital = next;
            }
        }
        self.update_properties(map);
    }

    fn update_properties(&mut self, map: &WorldMap) {
        self.area = self
            .regions
            .iter()
            .filter_map(|&r| map.region(r))
            .map(|r| r.area)
            .sum();
        self.clusters = map.find_clusters(&self.regions);
    }
}
