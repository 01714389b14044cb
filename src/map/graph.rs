//! Polygon graph - nodes, connections and the polygons they enclose
//!
//! Polygons are added as rings of node ids. Connections between two nodes
//! are created on first use and shared by every polygon that borders them,
//! which is what makes polygon adjacency recoverable.

use ahash::AHashMap;
use geo::{Area, BoundingRect, Centroid, LineString, Polygon};
use glam::Vec2;

use crate::core::error::{Result, SimError};
use crate::core::types::{ConnectionId, NodeId, PolygonId};

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub position: Vec2,
    /// Node lies on the map boundary
    pub is_edge_node: bool,
}

#[derive(Debug, Clone)]
pub struct GraphConnection {
    pub id: ConnectionId,
    pub start: NodeId,
    pub end: NodeId,
    pub length: f32,
    /// Polygons bordering this connection (one or two)
    pub polygons: Vec<PolygonId>,
}

#[derive(Debug, Clone)]
pub struct GraphPolygon {
    pub id: PolygonId,
    pub nodes: Vec<NodeId>,
    pub connections: Vec<ConnectionId>,
    pub neighbours: Vec<PolygonId>,
    pub is_edge_polygon: bool,
    pub width: f32,
    pub height: f32,
    pub area: f32,
    pub centroid: Vec2,
    /// How far the shape is from filling its bounding box (0 = rectangle)
    pub jaggedness: f32,
    pub is_water: bool,
    /// Water outside the playable map that frames every ocean
    pub is_outer_ocean: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PolygonGraph {
    nodes: Vec<GraphNode>,
    connections: Vec<GraphConnection>,
    polygons: Vec<GraphPolygon>,
    connection_lookup: AHashMap<(NodeId, NodeId), ConnectionId>,
}

impl PolygonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Vec2, is_edge_node: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            position,
            is_edge_node,
        });
        id
    }

    /// Add a polygon enclosed by `ring` (open ring, the last node connects back to the first)
    pub fn add_polygon(&mut self, ring: Vec<NodeId>) -> Result<PolygonId> {
        let positions = ring
            .iter()
            .map(|&id| self.node(id).map(|n| n.position).ok_or(SimError::UnknownNode(id)))
            .collect::<Result<Vec<Vec2>>>()?;

        let id = PolygonId(self.polygons.len() as u32);

        let mut connections = Vec::with_capacity(ring.len());
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let connection = self.connect(a, b);
            self.connections[connection.0 as usize].polygons.push(id);
            connections.push(connection);
        }

        let is_edge_polygon = ring.iter().any(|&n| self.nodes[n.0 as usize].is_edge_node);
        let geometry = PolygonGeometry::measure(&positions);

        self.polygons.push(GraphPolygon {
            id,
            nodes: ring,
            connections,
            neighbours: Vec::new(),
            is_edge_polygon,
            width: geometry.width,
            height: geometry.height,
            area: geometry.area,
            centroid: geometry.centroid,
            jaggedness: geometry.jaggedness(),
            is_water: false,
            is_outer_ocean: false,
        });

        Ok(id)
    }

    fn connect(&mut self, a: NodeId, b: NodeId) -> ConnectionId {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&existing) = self.connection_lookup.get(&key) {
            return existing;
        }

        let id = ConnectionId(self.connections.len() as u32);
        let length = self.nodes[a.0 as usize]
            .position
            .distance(self.nodes[b.0 as usize].position);
        self.connections.push(GraphConnection {
            id,
            start: a,
            end: b,
            length,
            polygons: Vec::new(),
        });
        self.connection_lookup.insert(key, id);
        id
    }

    /// Recompute polygon neighbours from shared connections
    pub fn set_neighbours(&mut self) {
        for i in 0..self.polygons.len() {
            let me = self.polygons[i].id;
            let mut neighbours = Vec::new();
            for c in &self.polygons[i].connections {
                for &p in &self.connections[c.0 as usize].polygons {
                    if p != me && !neighbours.contains(&p) {
                        neighbours.push(p);
                    }
                }
            }
            self.polygons[i].neighbours = neighbours;
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&GraphConnection> {
        self.connections.get(id.0 as usize)
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&GraphPolygon> {
        self.polygons.get(id.0 as usize)
    }

    pub fn polygon_mut(&mut self, id: PolygonId) -> Option<&mut GraphPolygon> {
        self.polygons.get_mut(id.0 as usize)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[GraphConnection] {
        &self.connections
    }

    pub fn polygons(&self) -> &[GraphPolygon] {
        &self.polygons
    }

    /// Summed length of all connections of a polygon
    pub fn perimeter(&self, id: PolygonId) -> f32 {
        self.polygon(id)
            .map(|p| {
                p.connections
                    .iter()
                    .map(|c| self.connections[c.0 as usize].length)
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Length of the border shared by two polygons (0 if not adjacent)
    pub fn shared_border_length(&self, a: PolygonId, b: PolygonId) -> f32 {
        self.polygon(a)
            .map(|p| {
                p.connections
                    .iter()
                    .map(|c| &self.connections[c.0 as usize])
                    .filter(|c| c.polygons.contains(&b))
                    .map(|c| c.length)
                    .sum()
            })
            .unwrap_or(0.0)
    }

    pub fn is_next_to_land(&self, id: PolygonId) -> bool {
        self.neighbours_matching(id, |p| !p.is_water)
    }

    pub fn is_next_to_water(&self, id: PolygonId) -> bool {
        self.neighbours_matching(id, |p| p.is_water)
    }

    fn neighbours_matching(&self, id: PolygonId, pred: impl Fn(&GraphPolygon) -> bool) -> bool {
        self.polygon(id)
            .map(|p| {
                p.neighbours
                    .iter()
                    .filter_map(|&n| self.polygon(n))
                    .any(pred)
            })
            .unwrap_or(false)
    }
}

/// Area, extents and centroid of a polygon ring
struct PolygonGeometry {
    area: f32,
    width: f32,
    height: f32,
    centroid: Vec2,
}

impl PolygonGeometry {
    fn measure(positions: &[Vec2]) -> Self {
        let coords: Vec<(f64, f64)> = positions
            .iter()
            .map(|p| (p.x as f64, p.y as f64))
            .collect();
        let polygon = Polygon::new(LineString::from(coords), vec![]);

        let (width, height) = polygon
            .bounding_rect()
            .map(|r| (r.width() as f32, r.height() as f32))
            .unwrap_or((0.0, 0.0));
        let centroid = polygon
            .centroid()
            .map(|c| Vec2::new(c.x() as f32, c.y() as f32))
            .unwrap_or(Vec2::ZERO);

        Self {
            area: polygon.unsigned_area() as f32,
            width,
            height,
            centroid,
        }
    }

    fn jaggedness(&self) -> f32 {
        let bbox = self.width * self.height;
        if bbox <= f32::EPSILON {
            return 0.0;
        }
        1.0 - self.area / bbox
    }
}
