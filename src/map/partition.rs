//! Region partitioning into landmasses and water bodies
//!
//! Regions are flood-filled into maximal connected groups. Land groups
//! only walk land regions; water groups only walk non-sentinel water
//! regions. The unassigned pool is an ordered set and each group starts at
//! its smallest region id, so group discovery order and group ids are a
//! pure function of the region set.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{LandmassId, RegionId, WaterBodyId};
use crate::map::region::Region;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmass {
    pub id: LandmassId,
    pub name: String,
    /// Member regions in ascending id order
    pub regions: Vec<RegionId>,
}

impl Landmass {
    pub fn size(&self) -> usize {
        self.regions.len()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterBody {
    pub id: WaterBodyId,
    pub name: String,
    pub regions: Vec<RegionId>,
    /// Ocean (touches the map edge) rather than a lake
    pub is_salt: bool,
}

impl WaterBody {
    pub fn size(&self) -> usize {
        self.regions.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub landmasses: Vec<Landmass>,
    pub water_bodies: Vec<WaterBody>,
}

/// Check that regions are stored by id and only reference known regions
pub fn validate_adjacency(regions: &[Region]) -> Result<()> {
    for (i, region) in regions.iter().enumerate() {
        if region.id.index() != i {
            return Err(SimError::Config(format!(
                "region at position {} has id {}",
                i, region.id.0
            )));
        }
        if let Some(&neighbor) = region.neighbors.iter().find(|n| n.index() >= regions.len()) {
            return Err(SimError::UnknownRegion {
                region: region.id,
                neighbor,
            });
        }
    }
    Ok(())
}

/// Partition all regions, overwriting their landmass / water-body back-references
pub fn partition_regions(regions: &mut [Region]) -> Result<Partition> {
    validate_adjacency(regions)?;

    for region in regions.iter_mut() {
        region.landmass = None;
        region.water_body = None;
    }

    let landmasses = find_landmasses(regions);
    let water_bodies = find_water_bodies(regions);

    tracing::debug!(
        landmasses = landmasses.len(),
        water_bodies = water_bodies.len(),
        oceans = water_bodies.iter().filter(|w| w.is_salt).count(),
        "partitioned map"
    );

    Ok(Partition {
        landmasses,
        water_bodies,
    })
}

fn find_landmasses(regions: &mut [Region]) -> Vec<Landmass> {
    let mut pool: BTreeSet<RegionId> = regions
        .iter()
        .filter(|r| !r.is_water)
        .map(|r| r.id)
        .collect();

    let mut landmasses = Vec::new();
    while let Some(start) = pool.pop_first() {
        let members = flood_fill(regions, start, |r| !r.is_water);
        let id = LandmassId(landmasses.len() as u32);
        for &m in &members {
            pool.remove(&m);
            regions[m.index()].landmass = Some(id);
        }
        landmasses.push(Landmass {
            id,
            name: format!("Landmass {}", id.0 + 1),
            regions: members,
        });
    }
    landmasses
}

fn find_water_bodies(regions: &mut [Region]) -> Vec<WaterBody> {
    let is_inner_water = |r: &Region| r.is_water && !r.is_outer_ocean;

    let mut pool: BTreeSet<RegionId> = regions
        .iter()
        .filter(|r| is_inner_water(r))
        .map(|r| r.id)
        .collect();

    let mut bodies: Vec<WaterBody> = Vec::new();
    let (mut oceans, mut lakes) = (0, 0);
    while let Some(start) = pool.pop_first() {
        let members = flood_fill(regions, start, is_inner_water);
        for m in &members {
            pool.remove(m);
        }

        let is_salt = members.iter().any(|m| regions[m.index()].is_edge);
        let name = if is_salt {
            oceans += 1;
            format!("Ocean {}", oceans)
        } else {
            lakes += 1;
            format!("Lake {}", lakes)
        };

        bodies.push(WaterBody {
            id: WaterBodyId(bodies.len() as u32),
            name,
            regions: members,
            is_salt,
        });
    }

    // Outer ocean sentinels join the first ocean, or form one of their own.
    // Other edge oceans stay separate bodies even though the ring links them.
    let outer: Vec<RegionId> = regions
        .iter()
        .filter(|r| r.is_outer_ocean)
        .map(|r| r.id)
        .collect();
    if !outer.is_empty() {
        match bodies.iter_mut().find(|b| b.is_salt) {
            Some(ocean) => {
                ocean.regions.extend(outer);
                ocean.regions.sort();
            }
            None => bodies.push(WaterBody {
                id: WaterBodyId(bodies.len() as u32),
                name: "Outer Ocean".to_string(),
                regions: outer,
                is_salt: true,
            }),
        }
    }

    for body in &bodies {
        for &m in &body.regions {
            regions[m.index()].water_body = Some(body.id);
        }
    }
    bodies
}

/// Breadth-first walk from `start` over neighbours satisfying `pred`
fn flood_fill(regions: &[Region], start: RegionId, pred: impl Fn(&Region) -> bool) -> Vec<RegionId> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for &n in &regions[current.index()].neighbors {
            if !visited.contains(&n) && pred(&regions[n.index()]) {
                visited.insert(n);
                queue.push_back(n);
            }
        }
    }

    visited.into_iter().collect()
}
