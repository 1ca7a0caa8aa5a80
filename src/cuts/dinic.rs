use std::collections::VecDeque;

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::trace;

use crate::cuts::FlowNetwork;

/// Level of nodes not reached by the breadth-first search.
const UNREACHED: u32 = u32::MAX;

impl FlowNetwork {
    /// Saturates the network with a maximum flow from source to sink using
    /// Dinic's algorithm and returns its value.
    ///
    /// Flow already present in the network is kept and only the increase is
    /// returned, so a second call returns 0.
    pub fn max_flow(&mut self) -> i64 {
        if self.source == self.sink {
            return 0;
        }
        let node_count = self.graph.node_count();
        let mut levels = vec![UNREACHED; node_count];
        let mut cursors = vec![0usize; node_count];
        let mut total = 0;
        let mut phase = 0usize;

        while self.assign_levels(&mut levels) {
            cursors.fill(0);
            let pushed = self.blocking_flow(&levels, &mut cursors);
            trace!(phase, pushed, sink_level = levels[self.sink.index()], "dinic phase");
            total += pushed;
            phase += 1;
        }
        total
    }

    /// Breadth-first search over edges with residual capacity. Returns whether
    /// the sink was reached.
    fn assign_levels(&self, levels: &mut [u32]) -> bool {
        levels.fill(UNREACHED);
        levels[self.source.index()] = 0;
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(self.source);

        while let Some(node) = queue.pop_front() {
            for &edge in &self.arcs[node.index()] {
                let next = self.head(edge);
                if levels[next.index()] == UNREACHED && self.graph[edge].residual() > 0 {
                    levels[next.index()] = levels[node.index()] + 1;
                    queue.push_back(next);
                }
            }
        }

        levels[self.sink.index()] != UNREACHED
    }

    /// Augments along admissible paths of the level graph until none is left.
    ///
    /// The search keeps the current path on an explicit stack. `cursors[v]` is
    /// the position of the next arc of `v` to try; arcs behind it are saturated
    /// or lead to dead ends for the rest of this phase.
    fn blocking_flow(&mut self, levels: &[u32], cursors: &mut [usize]) -> i64 {
        let mut pushed = 0;
        let mut path: Vec<EdgeIndex> = Vec::new();
        let mut node = self.source;

        loop {
            if node == self.sink {
                let bottleneck = path
                    .iter()
                    .map(|&edge| self.graph[edge].residual())
                    .min()
                    .unwrap_or(0);
                for &edge in &path {
                    self.push(edge, bottleneck);
                }
                pushed += bottleneck;
                path.clear();
                node = self.source;
                continue;
            }

            let arcs = &self.arcs[node.index()];
            let mut advanced = None;
            while let Some(&edge) = arcs.get(cursors[node.index()]) {
                let next = self.head(edge);
                if levels[next.index()] == levels[node.index()] + 1
                    && self.graph[edge].residual() > 0
                {
                    advanced = Some((edge, next));
                    break;
                }
                cursors[node.index()] += 1;
            }

            match advanced {
                Some((edge, next)) => {
                    path.push(edge);
                    node = next;
                }
                // dead end, retreat and never try the edge into it again this phase
                None => match path.pop() {
                    Some(edge) => {
                        node = self.tail(edge);
                        cursors[node.index()] += 1;
                    }
                    None => return pushed,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use petgraph::graph::NodeIndex;

    use crate::cuts::{anchor_size, FlowNetwork};
    use crate::graph::RoadNetwork;

    /// Network whose projection order is its insertion order.
    fn flow_network(network: &RoadNetwork, balance: f64) -> FlowNetwork {
        let order: Vec<NodeIndex> = network.vertices().map(|(v, _)| v).collect();
        let k = anchor_size(balance, order.len()).unwrap();
        FlowNetwork::build(network, &order, k).unwrap()
    }

    #[test]
    fn single_path_carries_one_unit() {
        let mut network = RoadNetwork::new();
        let v: Vec<_> = (0..4).map(|i| network.add_vertex(i as f64, 0.0)).collect();
        network.add_road(v[0], v[1]);
        network.add_road(v[1], v[2]);
        network.add_road(v[2], v[3]);

        let mut flow = flow_network(&network, 0.25);
        assert_eq!(1, flow.max_flow());
        assert!(flow.check_residual_invariant().is_ok());
        assert_eq!(0, flow.max_flow());
    }

    #[test]
    fn clrs_example() {
        // CLRS figure 26.1 with the middle four vertices as singletons
        let mut network = RoadNetwork::new();
        let s = network.add_vertex(0.0, 0.0);
        let v1 = network.add_vertex(1.0, 0.0);
        let v2 = network.add_vertex(2.0, 0.0);
        let v3 = network.add_vertex(3.0, 0.0);
        let v4 = network.add_vertex(4.0, 0.0);
        let t = network.add_vertex(5.0, 0.0);
        network.add_weighted_road(s, v1, 16);
        network.add_weighted_road(s, v2, 13);
        network.add_weighted_road(v2, v1, 4);
        network.add_weighted_road(v1, v3, 12);
        network.add_weighted_road(v3, v2, 9);
        network.add_weighted_road(v2, v4, 14);
        network.add_weighted_road(v4, v3, 7);
        network.add_weighted_road(v3, t, 20);
        network.add_weighted_road(v4, t, 4);

        let mut flow = flow_network(&network, 1.0 / 6.0 + 1e-9);
        assert_eq!(23, flow.max_flow());
        assert!(flow.check_residual_invariant().is_ok());
        for node in flow.inner_nodes() {
            assert_eq!(0, flow.excess(node));
        }
        assert_eq!(23, flow.excess(flow.sink()));
        assert_eq!(-23, flow.excess(flow.source()));
    }

    #[test]
    fn cross_road_does_not_block_parallel_routes() {
        let mut network = RoadNetwork::new();
        let s = network.add_vertex(0.0, 0.0);
        let a = network.add_vertex(1.0, 1.0);
        let b = network.add_vertex(1.0, -1.0);
        let t = network.add_vertex(2.0, 0.0);
        network.add_road(s, a);
        network.add_road(a, b);
        network.add_road(b, t);
        network.add_road(s, b);
        network.add_road(a, t);

        let mut flow = flow_network(&network, 0.25);
        assert_eq!(2, flow.max_flow());
        assert!(flow.check_residual_invariant().is_ok());
    }

    #[test]
    fn flow_is_cancelled_along_reverse_edges() {
        // the shortest path s-a-b-t has to give up a-b so that s-c-d-b-t and
        // s-a-e-f-t can both be routed
        let mut network = RoadNetwork::new();
        let s = network.add_vertex(0.0, 0.0);
        let a = network.add_vertex(1.0, 0.0);
        let b = network.add_vertex(2.0, 0.0);
        let c = network.add_vertex(1.0, 1.0);
        let d = network.add_vertex(2.0, 1.0);
        let e = network.add_vertex(1.0, -1.0);
        let f = network.add_vertex(2.0, -1.0);
        let t = network.add_vertex(3.0, 0.0);
        for (from, to) in [(s, a), (a, b), (b, t), (s, c), (c, d), (d, b), (a, e), (e, f), (f, t)] {
            network.add_road(from, to);
        }

        let mut flow = flow_network(&network, 0.125);
        assert_eq!(2, flow.max_flow());
        assert!(flow.check_residual_invariant().is_ok());
        let cross = flow
            .graph()
            .edge_indices()
            .find(|&edge| {
                FlowNetwork::is_forward(edge)
                    && flow.head(edge) == flow.node_of(b)
                    && flow.tail(edge) == flow.node_of(a)
            })
            .unwrap();
        assert_eq!(0, flow.edge(cross).flow);
    }

    #[test]
    fn disconnected_anchors_carry_no_flow() {
        let mut network = RoadNetwork::new();
        let v: Vec<_> = (0..6).map(|i| network.add_vertex(i as f64, 0.0)).collect();
        network.add_two_way_road(v[0], v[1]);
        network.add_two_way_road(v[4], v[5]);

        let mut flow = flow_network(&network, 0.2);
        assert_eq!(0, flow.max_flow());
    }

    #[test]
    fn direct_anchor_roads_are_saturated() {
        let mut network = RoadNetwork::new();
        let v: Vec<_> = (0..5).map(|i| network.add_vertex(i as f64, 0.0)).collect();
        network.add_weighted_road(v[0], v[4], 5);
        network.add_weighted_road(v[0], v[2], 2);
        network.add_weighted_road(v[2], v[4], 1);

        let mut flow = flow_network(&network, 0.2);
        assert_eq!(6, flow.max_flow());
    }

    #[test]
    fn long_paths_do_not_recurse() {
        let mut network = RoadNetwork::new();
        let v: Vec<_> = (0..100_000)
            .map(|i| network.add_vertex(i as f64, 0.0))
            .collect();
        for pair in v.windows(2) {
            network.add_road(pair[0], pair[1]);
        }

        let mut flow = flow_network(&network, 0.000015);
        assert_eq!(1, flow.max_flow());
    }
}
