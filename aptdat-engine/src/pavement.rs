//! Pavement polygons: a closed boundary ring plus zero or more hole
//! rings, with optional bezier control points per node.
//!
//! The assembly state machine (boundary phase, holes phase, new-hole
//! flag) is driven by the airport session; this module only holds the
//! accumulated value and its geometry serialization.

use crate::geo::Pos;

/// One polygon node, optionally with a quadratic/cubic bezier control
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PavementNode {
    pub pos: Pos,
    pub control: Option<Pos>,
}

impl PavementNode {
    pub fn new(pos: Pos, control: Option<Pos>) -> Self {
        Self { pos, control }
    }
}

/// An apron/taxiway pavement polygon under assembly.
#[derive(Debug, Clone, Default)]
pub struct Pavement {
    boundary: Vec<PavementNode>,
    holes: Vec<Vec<PavementNode>>,
}

impl Pavement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.boundary.clear();
        self.holes.clear();
    }

    pub fn add_boundary_node(&mut self, node: PavementNode) {
        self.boundary.push(node);
    }

    /// Append a node to the current hole, opening a new hole ring first
    /// when `new_hole` is set.
    pub fn add_hole_node(&mut self, node: PavementNode, new_hole: bool) {
        if new_hole || self.holes.is_empty() {
            self.holes.push(Vec::new());
        }
        if let Some(hole) = self.holes.last_mut() {
            hole.push(node);
        }
    }

    /// A pavement with no boundary nodes is not worth flushing.
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }

    pub fn boundary(&self) -> &[PavementNode] {
        &self.boundary
    }

    pub fn holes(&self) -> &[Vec<PavementNode>] {
        &self.holes
    }

    /// True if any ring has too few nodes to enclose an area. Such
    /// rings come from stray closing codes and are kept but reported.
    pub fn has_degenerate_ring(&self) -> bool {
        self.holes.iter().any(|h| h.len() < 3)
    }

    /// Serialize as a GeoJSON-style polygon string. Each node is a
    /// `[lon, lat]` pair, or `[lon, lat, ctrl_lon, ctrl_lat]` when a
    /// bezier control point is present. The first ring is the boundary,
    /// subsequent rings are holes.
    pub fn to_geometry(&self) -> String {
        let mut rings = Vec::with_capacity(1 + self.holes.len());
        rings.push(ring_to_string(&self.boundary));
        for hole in &self.holes {
            rings.push(ring_to_string(hole));
        }
        format!(
            r#"{{"type":"Polygon","coordinates":[{}]}}"#,
            rings.join(",")
        )
    }
}

fn ring_to_string(ring: &[PavementNode]) -> String {
    let nodes: Vec<String> = ring
        .iter()
        .map(|n| match n.control {
            Some(c) => format!("[{},{},{},{}]", n.pos.lon, n.pos.lat, c.lon, c.lat),
            None => format!("[{},{}]", n.pos.lon, n.pos.lat),
        })
        .collect();
    format!("[{}]", nodes.join(","))
}
