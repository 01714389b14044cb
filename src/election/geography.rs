//! Geography traits derived from a region's shape and position
//!
//! Each axis is tested against three descending thresholds; the first one
//! met decides the category (3, 2, then 1). An axis with no threshold met
//! contributes no trait.

use crate::election::traits::{GeographyTrait, GeographyTraitType};
use crate::map::region::Region;
use crate::map::world_map::WorldMap;

const COASTAL_RATIO: [f32; 3] = [0.7, 0.4, 0.1];
const ISLAND_SIZE: [usize; 3] = [1, 4, 7];
const TINY_AREA: [f32; 3] = [0.12, 0.18, 0.24];
const LARGE_AREA: [f32; 3] = [1.4, 1.3, 1.2];
/// Fraction of the map height/width counted as the north/south/east/west rim
const RIM_FRACTION: [f32; 3] = [0.1, 0.2, 0.3];
const LAKESIDE_RATIO: [f32; 3] = [0.3, 0.2, 0.1];

/// First matched test wins: index 0 -> category 3
fn graded(kind: GeographyTraitType, tests: [bool; 3]) -> Option<GeographyTrait> {
    tests.iter().position(|&t| t).map(|i| GeographyTrait {
        kind,
        category: 3 - i as u8,
    })
}

/// Geography traits of a land region, in axis order
pub fn geography_traits(region: &Region, map: &WorldMap) -> Vec<GeographyTrait> {
    let (w, h) = (map.width, map.height);
    let c = region.centroid;

    let coast = region.ocean_coast_ratio;
    let lake = region.lake_coast_ratio;
    let area = region.area;
    let landmass = map.landmass_size(region.id);

    let no_coast = !region.has_coast();
    let dry_neighbors = region
        .land_neighbors
        .iter()
        .filter_map(|&n| map.region(n))
        .filter(|n| !n.has_coast())
        .count();
    let all_neighbors_dry = dry_neighbors == region.land_neighbors.len();

    [
        graded(GeographyTraitType::Coastal, COASTAL_RATIO.map(|t| coast > t)),
        graded(
            GeographyTraitType::Landlocked,
            [no_coast && all_neighbors_dry, no_coast && dry_neighbors >= 2, no_coast],
        ),
        graded(GeographyTraitType::Island, ISLAND_SIZE.map(|s| landmass <= s && landmass > 0)),
        graded(GeographyTraitType::Tiny, TINY_AREA.map(|t| area <= t)),
        graded(GeographyTraitType::Large, LARGE_AREA.map(|t| area >= t)),
        graded(GeographyTraitType::Northern, RIM_FRACTION.map(|f| c.y > h - h * f)),
        graded(GeographyTraitType::Southern, RIM_FRACTION.map(|f| c.y < h * f)),
        graded(GeographyTraitType::Eastern, RIM_FRACTION.map(|f| c.x > w - w * f)),
        graded(GeographyTraitType::Western, RIM_FRACTION.map(|f| c.x < w * f)),
        graded(GeographyTraitType::Lakeside, LAKESIDE_RATIO.map(|t| lake > t)),
    ]
    .into_iter()
    .flatten()
    .collect()
}
