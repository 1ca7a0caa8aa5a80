use itertools::Itertools;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::cuts::{FlowNetwork, MinCut};
use crate::graph::RoadNetwork;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Part {
    /// Source side of the cut.
    Zero,
    /// Sink side of the cut.
    One,
}

impl Part {
    pub fn label(self) -> u8 {
        match self {
            Part::Zero => 0,
            Part::One => 1,
        }
    }
}

/// Assignment of every road vertex to one of two parts, indexed by vertex.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    parts: Vec<Part>,
}

impl Partition {
    /// Partition of a graph without vertices.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn part(&self, vertex: NodeIndex) -> Option<Part> {
        self.parts.get(vertex.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Part)> + '_ {
        self.parts
            .iter()
            .enumerate()
            .map(|(index, &part)| (NodeIndex::new(index), part))
    }

    pub fn count(&self, part: Part) -> usize {
        self.parts.iter().filter(|&&p| p == part).count()
    }

    pub fn vertices(&self, part: Part) -> Vec<NodeIndex> {
        self.iter()
            .filter(|&(_, p)| p == part)
            .map(|(vertex, _)| vertex)
            .collect_vec()
    }

    /// Roads running from part 0 into part 1.
    pub fn cut_roads(&self, network: &RoadNetwork) -> Vec<EdgeIndex> {
        network
            .roads()
            .filter(|road| {
                self.part(road.source()) == Some(Part::Zero)
                    && self.part(road.target()) == Some(Part::One)
            })
            .map(|road| road.id())
            .collect_vec()
    }

    /// Total weight of [`Partition::cut_roads`].
    pub fn cut_weight(&self, network: &RoadNetwork) -> u64 {
        self.cut_roads(network)
            .into_iter()
            .map(|road| u64::from(network.graph()[road].weight))
            .sum()
    }
}

/// Maps a minimum cut of `flow` back onto the vertices of `network`.
///
/// Vertices of the source anchor and of every flow node on the source side of
/// `cut` get part 0. Everything else, including vertices the flow never
/// touched, gets part 1.
pub fn assemble(network: &RoadNetwork, flow: &FlowNetwork, cut: &MinCut) -> Partition {
    let mut parts: Vec<Option<Part>> = vec![None; network.vertex_count()];

    for &vertex in flow.node(flow.source()).vertices() {
        parts[vertex.index()] = Some(Part::Zero);
    }
    for &node in &cut.source_side {
        for &vertex in flow.node(node).vertices() {
            parts[vertex.index()] = Some(Part::Zero);
        }
    }

    Partition {
        parts: parts
            .into_iter()
            .map(|part| part.unwrap_or(Part::One))
            .collect(),
    }
}
