use petgraph::graph::NodeIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Composite of the first vertices along the projection line.
    Source,
    /// Composite of the last vertices along the projection line.
    Sink,
    /// Exactly one vertex from the middle of the order.
    Singleton,
}

/// Node of the flow network, standing for one or more road vertices.
#[derive(Clone, Debug)]
pub struct FlowNode {
    kind: NodeKind,
    vertices: Vec<NodeIndex>,
}

impl FlowNode {
    pub fn new_source(vertices: Vec<NodeIndex>) -> Self {
        Self {
            kind: NodeKind::Source,
            vertices,
        }
    }

    pub fn new_sink(vertices: Vec<NodeIndex>) -> Self {
        Self {
            kind: NodeKind::Sink,
            vertices,
        }
    }

    pub fn new_singleton(vertex: NodeIndex) -> Self {
        Self {
            kind: NodeKind::Singleton,
            vertices: vec![vertex],
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Road vertices wrapped by this node, in projection order.
    pub fn vertices(&self) -> &[NodeIndex] {
        &self.vertices
    }
}
