//! Map topology
//!
//! Polygon graph, regions derived from it, and the landmass / water-body
//! partition.

pub mod generation;
pub mod graph;
pub mod partition;
pub mod region;
pub mod world_map;

pub use generation::{generate_graph, generate_map};
pub use graph::{GraphConnection, GraphNode, GraphPolygon, PolygonGraph};
pub use partition::{partition_regions, Landmass, Partition, WaterBody};
pub use region::Region;
pub use world_map::WorldMap;
