//! Region - a single polygon of the map with its derived geography

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{LandmassId, NationId, RegionId, WaterBodyId};

/// A land or water region of the map
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,

    // Geometry
    pub area: f32,
    pub centroid: Vec2,
    pub perimeter: f32,
    pub is_water: bool,
    /// Touches the boundary of the playable map
    pub is_edge: bool,
    /// Sentinel water framing the map; always part of an ocean
    pub is_outer_ocean: bool,

    // Adjacency
    pub neighbors: Vec<RegionId>,
    /// Shared border length with each entry of `neighbors`
    pub border_lengths: Vec<f32>,
    pub land_neighbors: Vec<RegionId>,

    // Coast, filled in after partitioning
    pub coast_length: f32,
    pub ocean_coast_ratio: f32,
    pub lake_coast_ratio: f32,

    // Back-references
    pub landmass: Option<LandmassId>,
    pub water_body: Option<WaterBodyId>,

    // Ownership
    pub nation: Option<NationId>,
}

impl Region {
    pub fn new(id: RegionId, area: f32, centroid: Vec2, is_water: bool) -> Self {
        Self {
            id,
            name: format!("Region_{}", id.0),
            area,
            centroid,
            perimeter: 0.0,
            is_water,
            is_edge: false,
            is_outer_ocean: false,
            neighbors: Vec::new(),
            border_lengths: Vec::new(),
            land_neighbors: Vec::new(),
            coast_length: 0.0,
            ocean_coast_ratio: 0.0,
            lake_coast_ratio: 0.0,
            landmass: None,
            water_body: None,
            nation: None,
        }
    }

    pub fn land(id: u32, area: f32, centroid: Vec2) -> Self {
        Self::new(RegionId(id), area, centroid, false)
    }

    pub fn water(id: u32, area: f32, centroid: Vec2) -> Self {
        Self::new(RegionId(id), area, centroid, true)
    }

    pub fn outer_ocean(id: u32) -> Self {
        let mut region = Self::new(RegionId(id), 0.0, Vec2::ZERO, true);
        region.is_outer_ocean = true;
        region.is_edge = true;
        region
    }

    pub fn with_edge(mut self, is_edge: bool) -> Self {
        self.is_edge = is_edge;
        self
    }

    /// Add a neighbour with the length of the shared border
    pub fn add_neighbor(&mut self, other: RegionId, border_length: f32) {
        if other == self.id || self.neighbors.contains(&other) {
            return;
        }
        self.neighbors.push(other);
        self.border_lengths.push(border_length);
        self.perimeter += border_length;
    }

    pub fn border_with(&self, other: RegionId) -> f32 {
        self.neighbors
            .iter()
            .position(|&n| n == other)
            .map(|i| self.border_lengths[i])
            .unwrap_or(0.0)
    }

    pub fn is_adjacent_to(&self, other: RegionId) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn has_coast(&self) -> bool {
        self.coast_length > 0.0
    }
}
