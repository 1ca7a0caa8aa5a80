use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A road junction with its planar position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point,
}

/// A directed road between two junctions. The weight becomes the capacity of
/// the corresponding flow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub weight: u32,
}

impl Default for Road {
    fn default() -> Self {
        Self { weight: 1 }
    }
}

/// Read-only input of the bisection: an arena of vertices addressed by their
/// insertion index, with roads stored as index pairs.
///
/// Vertices are never removed, so a `NodeIndex` stays valid for the lifetime
/// of the network.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: DiGraph<Vertex, Road>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, x: f64, y: f64) -> NodeIndex {
        self.graph.add_node(Vertex {
            position: Point::new(x, y),
        })
    }

    /// Adds a one-way road of unit weight.
    pub fn add_road(&mut self, from: NodeIndex, to: NodeIndex) -> EdgeIndex {
        self.add_weighted_road(from, to, 1)
    }

    pub fn add_weighted_road(&mut self, from: NodeIndex, to: NodeIndex, weight: u32) -> EdgeIndex {
        self.graph.add_edge(from, to, Road { weight })
    }

    /// Adds a unit road in each direction.
    pub fn add_two_way_road(&mut self, a: NodeIndex, b: NodeIndex) -> (EdgeIndex, EdgeIndex) {
        (self.add_road(a, b), self.add_road(b, a))
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn road_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn vertex(&self, vertex: NodeIndex) -> Option<&Vertex> {
        self.graph.node_weight(vertex)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (NodeIndex, &Vertex)> + '_ {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    pub fn roads(&self) -> impl Iterator<Item = EdgeReference<'_, Road>> {
        self.graph.edge_references()
    }

    pub fn graph(&self) -> &DiGraph<Vertex, Road> {
        &self.graph
    }

    /// Total weight of roads from `from` to `to`.
    pub fn weight_between(&self, from: NodeIndex, to: NodeIndex) -> u64 {
        self.graph
            .edges_connecting(from, to)
            .map(|road| u64::from(road.weight().weight))
            .sum()
    }
}

impl From<DiGraph<Vertex, Road>> for RoadNetwork {
    fn from(graph: DiGraph<Vertex, Road>) -> Self {
        Self { graph }
    }
}
