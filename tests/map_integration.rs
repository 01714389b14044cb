//! Integration tests for map generation and the landmass / water-body partition

use election_tactics::core::config::MapConfig;
use election_tactics::core::types::RegionId;
use election_tactics::election::geography_traits;
use election_tactics::map::{generate_map, partition_regions, WorldMap};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn map(seed: u64) -> WorldMap {
    let config = MapConfig {
        seed,
        ..MapConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_map(&config, &mut rng).unwrap()
}

#[test]
fn test_every_region_in_exactly_one_group() {
    let map = map(12345);

    let mut land_seen = vec![0; map.regions.len()];
    for landmass in &map.landmasses {
        for r in &landmass.regions {
            land_seen[r.index()] += 1;
            assert_eq!(map.regions[r.index()].landmass, Some(landmass.id));
        }
    }
    let mut water_seen = vec![0; map.regions.len()];
    for body in &map.water_bodies {
        for r in &body.regions {
            water_seen[r.index()] += 1;
            assert_eq!(map.regions[r.index()].water_body, Some(body.id));
        }
    }

    for region in &map.regions {
        if region.is_water {
            assert_eq!(land_seen[region.id.index()], 0);
            assert_eq!(water_seen[region.id.index()], 1, "{}", region.id);
        } else {
            assert_eq!(land_seen[region.id.index()], 1, "{}", region.id);
            assert_eq!(water_seen[region.id.index()], 0);
        }
    }
}

#[test]
fn test_groups_are_connected_and_maximal() {
    let map = map(7);
    for landmass in &map.landmasses {
        assert_eq!(map.find_clusters(&landmass.regions).len(), 1);
        for r in &landmass.regions {
            for n in &map.regions[r.index()].land_neighbors {
                assert!(landmass.regions.contains(n));
            }
        }
    }
}

#[test]
fn test_partition_is_idempotent() {
    let mut map = map(99);
    let landmasses = map.landmasses.clone();
    let water_bodies = map.water_bodies.clone();

    map.repartition().unwrap();
    assert_eq!(map.landmasses, landmasses);
    assert_eq!(map.water_bodies, water_bodies);

    let mut regions = map.regions.clone();
    let again = partition_regions(&mut regions).unwrap();
    assert_eq!(again.landmasses, landmasses);
    assert_eq!(again.water_bodies, water_bodies);
}

#[test]
fn test_outer_ocean_is_salt() {
    let map = map(3);
    for body in &map.water_bodies {
        let touches_outer = body
            .regions
            .iter()
            .any(|r| map.regions[r.index()].is_outer_ocean);
        if touches_outer {
            assert!(body.is_salt, "{}", body.name);
        }
    }
    assert!(map.water_bodies.iter().any(|b| b.is_salt));
}

#[test]
fn test_generation_is_reproducible() {
    let a = map(42);
    let b = map(42);
    assert_eq!(a.num_land_regions(), b.num_land_regions());
    assert_eq!(a.landmasses, b.landmasses);
    let land: Vec<RegionId> = a.land_regions().map(|r| r.id).collect();
    for id in land {
        let ta = geography_traits(a.region(id).unwrap(), &a);
        let tb = geography_traits(b.region(id).unwrap(), &b);
        assert_eq!(ta, tb);
    }
}

#[test]
fn test_geography_categories_in_range() {
    let map = map(5);
    for region in map.land_regions() {
        for t in geography_traits(region, &map) {
            assert!((1..=3).contains(&t.category), "{t}");
        }
    }
}
