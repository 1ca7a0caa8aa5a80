mod cut;
mod dinic;
mod flow_network;

pub use cut::MinCut;
pub use flow_network::anchor_size;
pub use flow_network::{FlowEdge, FlowGraph, FlowNetwork};
