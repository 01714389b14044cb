//! WorldMap - regions plus their landmass and water-body partition

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{LandmassId, RegionId, WaterBodyId};
use crate::map::graph::PolygonGraph;
use crate::map::partition::{partition_regions, Landmass, WaterBody};
use crate::map::region::Region;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldMap {
    pub width: f32,
    pub height: f32,
    pub regions: Vec<Region>,
    pub landmasses: Vec<Landmass>,
    pub water_bodies: Vec<WaterBody>,
}

impl WorldMap {
    /// Build a map from regions stored by id; partitions and derives coasts
    pub fn new(width: f32, height: f32, regions: Vec<Region>) -> Result<Self> {
        let mut map = Self {
            width,
            height,
            regions,
            landmasses: Vec::new(),
            water_bodies: Vec::new(),
        };
        map.repartition()?;
        Ok(map)
    }

    /// One region per polygon, adjacency and border lengths from shared connections
    pub fn from_graph(graph: &PolygonGraph, width: f32, height: f32) -> Result<Self> {
        let mut regions: Vec<Region> = graph
            .polygons()
            .iter()
            .map(|p| {
                let mut region = Region::new(p.id.into(), p.area, p.centroid, p.is_water);
                region.is_edge = p.is_edge_polygon;
                region.is_outer_ocean = p.is_outer_ocean;
                region
            })
            .collect();

        for polygon in graph.polygons() {
            let region = &mut regions[polygon.id.0 as usize];
            for &n in &polygon.neighbours {
                region.add_neighbor(n.into(), graph.shared_border_length(polygon.id, n));
            }
            // Map-boundary connections count towards the perimeter too
            let open_border: f32 = polygon
                .connections
                .iter()
                .filter_map(|&c| graph.connection(c))
                .filter(|c| c.polygons.len() == 1)
                .map(|c| c.length)
                .sum();
            region.perimeter += open_border;
        }

        Self::new(width, height, regions)
    }

    /// Recompute landmasses, water bodies and coast figures.
    ///
    /// Must be called after any change to adjacency or water flags.
    pub fn repartition(&mut self) -> Result<()> {
        let partition = partition_regions(&mut self.regions)?;
        self.landmasses = partition.landmasses;
        self.water_bodies = partition.water_bodies;
        self.update_coasts();
        Ok(())
    }

    fn update_coasts(&mut self) {
        let mut updates = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            let mut coast = 0.0;
            let mut ocean = 0.0;
            let mut lake = 0.0;
            let mut land_neighbors = Vec::new();

            for (&n, &length) in region.neighbors.iter().zip(&region.border_lengths) {
                let neighbor = &self.regions[n.index()];
                if !neighbor.is_water {
                    land_neighbors.push(n);
                    continue;
                }
                coast += length;
                if self.is_salt_water(neighbor) {
                    ocean += length;
                } else {
                    lake += length;
                }
            }
            updates.push((coast, ocean, lake, land_neighbors));
        }

        for (region, (coast, ocean, lake, land_neighbors)) in self.regions.iter_mut().zip(updates) {
            region.land_neighbors = land_neighbors;
            if region.is_water {
                region.coast_length = 0.0;
                region.ocean_coast_ratio = 0.0;
                region.lake_coast_ratio = 0.0;
                continue;
            }
            region.coast_length = coast;
            if region.perimeter > 0.0 {
                region.ocean_coast_ratio = ocean / region.perimeter;
                region.lake_coast_ratio = lake / region.perimeter;
            }
        }
    }

    fn is_salt_water(&self, region: &Region) -> bool {
        region.is_outer_ocean
            || region
                .water_body
                .and_then(|id| self.water_body(id))
                .is_some_and(|w| w.is_salt)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id.index())
    }

    pub fn try_region(&self, id: RegionId) -> Result<&Region> {
        self.region(id).ok_or(SimError::RegionNotFound(id))
    }

    pub fn landmass(&self, id: LandmassId) -> Option<&Landmass> {
        self.landmasses.get(id.0 as usize)
    }

    pub fn water_body(&self, id: WaterBodyId) -> Option<&WaterBody> {
        self.water_bodies.get(id.0 as usize)
    }

    /// Size of the landmass a region belongs to (0 for water)
    pub fn landmass_size(&self, id: RegionId) -> usize {
        self.region(id)
            .and_then(|r| r.landmass)
            .and_then(|l| self.landmass(l))
            .map(|l| l.size())
            .unwrap_or(0)
    }

    pub fn land_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.is_water)
    }

    pub fn water_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.is_water)
    }

    pub fn num_land_regions(&self) -> usize {
        self.land_regions().count()
    }

    pub fn num_water_regions(&self) -> usize {
        self.water_regions().count()
    }

    pub fn land_area(&self) -> f32 {
        self.land_regions().map(|r| r.area).sum()
    }

    /// Water area inside the playable map
    pub fn water_area(&self) -> f32 {
        self.water_regions()
            .filter(|r| !r.is_outer_ocean)
            .map(|r| r.area)
            .sum()
    }

    pub fn num_landmasses(&self) -> usize {
        self.landmasses.len()
    }

    pub fn num_water_bodies(&self) -> usize {
        self.water_bodies.len()
    }

    /// Split a set of regions into groups connected through members of the set
    pub fn find_clusters(&self, members: &[RegionId]) -> Vec<Vec<RegionId>> {
        let mut pool: BTreeSet<RegionId> = members.iter().copied().collect();
        let mut clusters = Vec::new();

        while let Some(start) = pool.pop_first() {
            let mut cluster = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                let Some(region) = self.region(current) else {
                    continue;
                };
                for n in &region.neighbors {
                    if pool.remove(n) {
                        cluster.push(*n);
                        queue.push_back(*n);
                    }
                }
            }
            cluster.sort();
            clusters.push(cluster);
        }

        clusters
    }
}
