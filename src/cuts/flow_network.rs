use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::error::{ConfigError, InvariantViolation};
use crate::graph::RoadNetwork;
use crate::node::{FlowNode, NodeKind};

/// Residual-capacity edge. Every edge of the network has a partner running the
/// other way whose flow is the negation of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEdge {
    pub capacity: i64,
    pub flow: i64,
    pub reverse: EdgeIndex,
}

impl FlowEdge {
    pub fn residual(&self) -> i64 {
        self.capacity - self.flow
    }
}

pub type FlowGraph = DiGraph<FlowNode, FlowEdge>;

/// Number of vertices in each anchor group for `balance` on a graph with
/// `vertex_count` vertices.
pub fn anchor_size(balance: f64, vertex_count: usize) -> Result<usize, ConfigError> {
    if !(balance > 0.0 && balance < 0.5) {
        return Err(ConfigError::BalanceOutOfRange(balance));
    }
    let anchor_size = (balance * vertex_count as f64).floor() as usize;
    if anchor_size == 0 {
        return Err(ConfigError::EmptyAnchorGroups {
            balance,
            vertex_count,
        });
    }
    if 2 * anchor_size >= vertex_count {
        return Err(ConfigError::OverlappingAnchorGroups {
            anchor_size,
            vertex_count,
        });
    }
    Ok(anchor_size)
}

/// Flow network between the two anchor groups of a projection order.
///
/// Forward edges and their reverse partners are inserted as adjacent pairs, so
/// forward edges have even indices and reverse edges odd ones.
pub struct FlowNetwork {
    pub(super) graph: FlowGraph,
    pub(super) source: NodeIndex,
    pub(super) sink: NodeIndex,
    /// Outgoing residual arcs per flow node, the order the blocking flow scans them in.
    pub(super) arcs: Vec<Vec<EdgeIndex>>,
    /// Flow node of every road vertex, indexed by vertex.
    node_of: Vec<NodeIndex>,
}

impl FlowNetwork {
    /// Builds the network for `order`, which must list every vertex of
    /// `network` exactly once, with anchor groups of `k` vertices.
    ///
    /// The first and last `k` vertices collapse into the source and sink
    /// nodes; roads inside one of them are dropped. `k` usually comes from
    /// [`anchor_size`].
    pub fn build(network: &RoadNetwork, order: &[NodeIndex], k: usize) -> Result<Self, ConfigError> {
        let vertex_count = network.vertex_count();
        if order.len() != vertex_count {
            return Err(ConfigError::InvalidOrder { vertex_count });
        }
        if k == 0 || 2 * k >= vertex_count {
            return Err(ConfigError::AnchorSizeOutOfRange {
                anchor_size: k,
                vertex_count,
            });
        }

        let mut graph = FlowGraph::with_capacity(vertex_count - 2 * k + 2, 2 * network.road_count());
        let mut node_of = vec![NodeIndex::end(); vertex_count];
        // each slot is filled once; with `order.len() == n` that makes it a permutation
        let mut assign = |vertex: NodeIndex, node: NodeIndex| match node_of.get_mut(vertex.index()) {
            Some(slot) if *slot == NodeIndex::end() => {
                *slot = node;
                Ok(())
            }
            _ => Err(ConfigError::InvalidOrder { vertex_count }),
        };

        let source = graph.add_node(FlowNode::new_source(order[..k].to_vec()));
        for &vertex in &order[..k] {
            assign(vertex, source)?;
        }
        for &vertex in &order[k..vertex_count - k] {
            assign(vertex, graph.add_node(FlowNode::new_singleton(vertex)))?;
        }
        let sink = graph.add_node(FlowNode::new_sink(order[vertex_count - k..].to_vec()));
        for &vertex in &order[vertex_count - k..] {
            assign(vertex, sink)?;
        }

        for road in network.roads() {
            let from = node_of[road.source().index()];
            let to = node_of[road.target().index()];
            if from == to {
                continue;
            }
            let forward = EdgeIndex::new(graph.edge_count());
            let reverse = EdgeIndex::new(forward.index() + 1);
            graph.add_edge(
                from,
                to,
                FlowEdge {
                    capacity: i64::from(road.weight().weight),
                    flow: 0,
                    reverse,
                },
            );
            graph.add_edge(
                to,
                from,
                FlowEdge {
                    capacity: 0,
                    flow: 0,
                    reverse: forward,
                },
            );
        }

        let arcs = graph
            .node_indices()
            .map(|node| graph.edges(node).map(|edge| edge.id()).collect())
            .collect();

        Ok(Self {
            graph,
            source,
            sink,
            arcs,
            node_of,
        })
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    pub fn node(&self, node: NodeIndex) -> &FlowNode {
        &self.graph[node]
    }

    /// Flow node containing the road vertex `vertex`.
    pub fn node_of(&self, vertex: NodeIndex) -> NodeIndex {
        self.node_of[vertex.index()]
    }

    pub fn is_forward(edge: EdgeIndex) -> bool {
        edge.index() % 2 == 0
    }

    pub fn edge(&self, edge: EdgeIndex) -> &FlowEdge {
        &self.graph[edge]
    }

    pub(super) fn head(&self, edge: EdgeIndex) -> NodeIndex {
        self.graph.raw_edges()[edge.index()].target()
    }

    pub(super) fn tail(&self, edge: EdgeIndex) -> NodeIndex {
        self.graph.raw_edges()[edge.index()].source()
    }

    /// Sends `amount` along `edge`, keeping its partner mirrored.
    pub(super) fn push(&mut self, edge: EdgeIndex, amount: i64) {
        let reverse = self.graph[edge].reverse;
        self.graph[edge].flow += amount;
        self.graph[reverse].flow -= amount;
        debug_assert!(self.graph[edge].flow <= self.graph[edge].capacity);
    }

    /// Inflow minus outflow of `node`, counted over forward edges.
    pub fn excess(&self, node: NodeIndex) -> i64 {
        let inflow: i64 = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(|edge| Self::is_forward(edge.id()))
            .map(|edge| edge.weight().flow)
            .sum();
        let outflow: i64 = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| Self::is_forward(edge.id()))
            .map(|edge| edge.weight().flow)
            .sum();
        inflow - outflow
    }

    /// Checks `0 <= flow <= capacity` on forward edges and
    /// `forward.flow == -reverse.flow` on every pair.
    pub fn check_residual_invariant(&self) -> Result<(), InvariantViolation> {
        for edge in self.graph.edge_references() {
            let data = edge.weight();
            let partner = &self.graph[data.reverse];
            if partner.reverse != edge.id() || data.flow != -partner.flow {
                return Err(InvariantViolation::UnmirroredFlow {
                    edge: edge.id().index(),
                    flow: data.flow,
                    reverse_flow: partner.flow,
                });
            }
            if Self::is_forward(edge.id()) && !(0..=data.capacity).contains(&data.flow) {
                return Err(InvariantViolation::FlowOutOfRange {
                    edge: edge.id().index(),
                    flow: data.flow,
                    capacity: data.capacity,
                });
            }
        }
        Ok(())
    }

    /// Flow nodes that are not anchors.
    pub fn inner_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(|&node| self.graph[node].kind() == NodeKind::Singleton)
    }
}

#[cfg(test)]
mod tests {
    use petgraph::graph::{EdgeIndex, NodeIndex};

    use crate::cuts::FlowNetwork;
    use crate::cuts::flow_network::anchor_size;
    use crate::error::{ConfigError, InvariantViolation};
    use crate::graph::RoadNetwork;
    use crate::node::NodeKind;

    fn path(n: usize) -> (RoadNetwork, Vec<NodeIndex>) {
        let mut network = RoadNetwork::new();
        let vertices: Vec<_> = (0..n).map(|i| network.add_vertex(i as f64, 0.0)).collect();
        for pair in vertices.windows(2) {
            network.add_two_way_road(pair[0], pair[1]);
        }
        (network, vertices)
    }

    #[test]
    fn anchor_size_rejects_bad_balance() {
        assert_eq!(Err(ConfigError::BalanceOutOfRange(0.5)), anchor_size(0.5, 10));
        assert_eq!(Err(ConfigError::BalanceOutOfRange(0.0)), anchor_size(0.0, 10));
        assert!(anchor_size(f64::NAN, 10).is_err());
        assert_eq!(
            Err(ConfigError::EmptyAnchorGroups {
                balance: 0.25,
                vertex_count: 2
            }),
            anchor_size(0.25, 2)
        );
        assert_eq!(Ok(2), anchor_size(0.25, 8));
        assert_eq!(Ok(4), anchor_size(0.49, 9));
    }

    #[test]
    fn duplicate_vertex_in_order_is_rejected() {
        let mut network = RoadNetwork::new();
        let v: Vec<_> = (0..4).map(|i| network.add_vertex(i as f64, 0.0)).collect();
        network.add_road(v[1], v[2]);

        let result = FlowNetwork::build(&network, &[v[0], v[2], v[2], v[3]], 1);
        assert_eq!(Some(ConfigError::InvalidOrder { vertex_count: 4 }), result.err());
    }

    #[test]
    fn incomplete_or_foreign_order_is_rejected() {
        let (network, vertices) = path(4);
        let short = FlowNetwork::build(&network, &vertices[..3], 1);
        assert_eq!(Some(ConfigError::InvalidOrder { vertex_count: 4 }), short.err());

        let foreign = [vertices[0], vertices[1], vertices[2], NodeIndex::new(9)];
        let result = FlowNetwork::build(&network, &foreign, 1);
        assert_eq!(Some(ConfigError::InvalidOrder { vertex_count: 4 }), result.err());
    }

    #[test]
    fn anchor_size_must_leave_two_disjoint_groups() {
        let (network, vertices) = path(4);
        for k in [0, 2, 3] {
            let result = FlowNetwork::build(&network, &vertices, k);
            assert_eq!(
                Some(ConfigError::AnchorSizeOutOfRange {
                    anchor_size: k,
                    vertex_count: 4
                }),
                result.err()
            );
        }
    }

    #[test]
    fn anchors_collapse_the_ends_of_the_order() {
        let (network, vertices) = path(8);
        let flow = FlowNetwork::build(&network, &vertices, 2).unwrap();

        // 2 anchors + 4 singletons
        assert_eq!(6, flow.graph().node_count());
        assert_eq!(NodeKind::Source, flow.node(flow.source()).kind());
        assert_eq!(NodeKind::Sink, flow.node(flow.sink()).kind());
        assert_eq!(&vertices[..2], flow.node(flow.source()).vertices());
        assert_eq!(&vertices[6..], flow.node(flow.sink()).vertices());
        assert_eq!(4, flow.inner_nodes().count());
        for &vertex in &vertices[2..6] {
            let node = flow.node_of(vertex);
            assert_eq!(NodeKind::Singleton, flow.node(node).kind());
            assert_eq!(&[vertex], flow.node(node).vertices());
        }
    }

    #[test]
    fn roads_inside_an_anchor_are_dropped() {
        let (network, vertices) = path(8);
        let flow = FlowNetwork::build(&network, &vertices, 2).unwrap();

        // 7 two-way roads, the ones inside source and sink disappear
        assert_eq!(5 * 2 * 2, flow.graph().edge_count());
        assert!(flow.check_residual_invariant().is_ok());
    }

    #[test]
    fn edges_come_in_mirrored_pairs() {
        let (mut network, vertices) = path(4);
        network.add_weighted_road(vertices[1], vertices[2], 7);
        let flow = FlowNetwork::build(&network, &vertices, 1).unwrap();

        for index in (0..flow.graph().edge_count()).step_by(2) {
            let forward = EdgeIndex::new(index);
            let reverse = flow.edge(forward).reverse;
            assert!(FlowNetwork::is_forward(forward));
            assert!(!FlowNetwork::is_forward(reverse));
            assert_eq!(forward, flow.edge(reverse).reverse);
            assert_eq!(0, flow.edge(reverse).capacity);
            assert_eq!(flow.head(forward), flow.tail(reverse));
        }
        let weighted = flow
            .graph()
            .edge_indices()
            .filter(|&edge| flow.edge(edge).capacity == 7)
            .count();
        assert_eq!(1, weighted);
    }

    #[test]
    fn corrupted_flow_is_reported() {
        let (network, vertices) = path(4);
        let mut flow = FlowNetwork::build(&network, &vertices, 1).unwrap();
        let edge = EdgeIndex::new(0);
        flow.graph[edge].flow = 1;
        assert!(matches!(
            flow.check_residual_invariant(),
            Err(InvariantViolation::UnmirroredFlow { .. })
        ));

        let mut flow = FlowNetwork::build(&network, &vertices, 1).unwrap();
        flow.graph[EdgeIndex::new(0)].flow = -1;
        flow.graph[EdgeIndex::new(1)].flow = 1;
        assert!(matches!(
            flow.check_residual_invariant(),
            Err(InvariantViolation::FlowOutOfRange { .. })
        ));
    }
}
