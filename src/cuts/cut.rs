use petgraph::graph::{EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::{Bfs, EdgeFiltered, EdgeRef};

use crate::cuts::{FlowEdge, FlowNetwork};

/// Minimum s-t cut read off a saturated flow network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinCut {
    /// Flow nodes reachable from the source in the residual graph.
    pub source_side: Vec<NodeIndex>,
    pub sink_side: Vec<NodeIndex>,
    /// Forward edges leaving the source side.
    pub cut_set: Vec<EdgeIndex>,
    /// Total capacity of `cut_set`; equals the maximum flow value.
    pub capacity: i64,
}

impl MinCut {
    /// Collects everything reachable from the source over edges with residual
    /// capacity left. Only meaningful once `network` carries a maximum flow.
    pub fn new(network: &FlowNetwork) -> Self {
        let residual = EdgeFiltered::from_fn(network.graph(), |edge: EdgeReference<'_, FlowEdge>| {
            edge.weight().residual() > 0
        });
        let mut reachable = vec![false; network.graph().node_count()];

        let mut bfs = Bfs::new(&residual, network.source());
        while let Some(node) = bfs.next(&residual) {
            reachable[node.index()] = true;
        }

        let (source_side, sink_side): (Vec<NodeIndex>, Vec<NodeIndex>) = network
            .graph()
            .node_indices()
            .partition(|node| reachable[node.index()]);

        let cut_set: Vec<EdgeIndex> = network
            .graph()
            .edge_references()
            .filter(|edge| {
                FlowNetwork::is_forward(edge.id())
                    && reachable[edge.source().index()]
                    && !reachable[edge.target().index()]
            })
            .map(|edge| edge.id())
            .collect();
        let capacity = cut_set
            .iter()
            .map(|&edge| network.edge(edge).capacity)
            .sum();

        Self {
            source_side,
            sink_side,
            cut_set,
            capacity,
        }
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.source_side.binary_search(&node).is_ok()
    }
}
