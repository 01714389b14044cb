//! Procedural map generation
//!
//! Builds a jittered grid of quadrilateral polygons. The outermost ring of
//! cells is outer ocean; inner cells become water by chance, with cells on
//! the map edge twice as likely so that coastlines form.

use rand::Rng;

use crate::core::config::MapConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{NodeId, PolygonId};
use crate::map::graph::PolygonGraph;
use crate::map::world_map::WorldMap;

use glam::Vec2;

/// Generate the polygon graph for a map
pub fn generate_graph<R: Rng>(config: &MapConfig, rng: &mut R) -> Result<PolygonGraph> {
    if config.width < 3 || config.height < 3 {
        return Err(SimError::Config(format!(
            "map of {}x{} cells has no interior",
            config.width, config.height
        )));
    }

    let (w, h) = (config.width, config.height);
    let jitter = config.jitter * config.cell_size;
    let mut graph = PolygonGraph::new();

    // Nodes, row-major over (w + 1) x (h + 1) grid points
    let mut nodes = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for j in 0..=h {
        for i in 0..=w {
            let boundary = i == 0 || j == 0 || i == w || j == h;
            let offset = if boundary || jitter <= 0.0 {
                Vec2::ZERO
            } else {
                Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
            };
            let position = Vec2::new(i as f32, j as f32) * config.cell_size + offset;
            // The playable boundary is the inner rim of the outer ocean ring
            let is_edge = i <= 1 || j <= 1 || i >= w - 1 || j >= h - 1;
            nodes.push(graph.add_node(position, is_edge));
        }
    }
    let node_at = |i: u32, j: u32| -> NodeId { nodes[(j * (w + 1) + i) as usize] };

    for y in 0..h {
        for x in 0..w {
            let ring = vec![
                node_at(x, y),
                node_at(x + 1, y),
                node_at(x + 1, y + 1),
                node_at(x, y + 1),
            ];
            graph.add_polygon(ring)?;
        }
    }
    graph.set_neighbours();

    for y in 0..h {
        for x in 0..w {
            let id = PolygonId(y * w + x);
            let outer = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            let is_edge = graph.polygon(id).is_some_and(|p| p.is_edge_polygon);
            let chance = if is_edge {
                (config.water_frequency * 2.0).min(1.0)
            } else {
                config.water_frequency
            };
            let is_water = outer || rng.gen::<f32>() < chance;

            if let Some(polygon) = graph.polygon_mut(id) {
                polygon.is_water = is_water;
                polygon.is_outer_ocean = outer;
            }
        }
    }

    Ok(graph)
}

/// Generate a partitioned map
pub fn generate_map<R: Rng>(config: &MapConfig, rng: &mut R) -> Result<WorldMap> {
    let graph = generate_graph(config, rng)?;
    let map = WorldMap::from_graph(&graph, config.world_width(), config.world_height())?;

    tracing::info!(
        regions = map.regions.len(),
        land = map.num_land_regions(),
        landmasses = map.num_landmasses(),
        water_bodies = map.num_water_bodies(),
        "generated map"
    );

    Ok(map)
}
