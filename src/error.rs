use thiserror::Error;

use crate::geometry::Point;

/// Problems with the configuration of a bisection, reported before any
/// projection or flow computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("balance {0} is outside the open interval (0, 0.5)")]
    BalanceOutOfRange(f64),
    #[error("balance {balance} leaves empty anchor groups for a graph with {vertex_count} vertices")]
    EmptyAnchorGroups { balance: f64, vertex_count: usize },
    #[error("anchor groups of size {anchor_size} overlap in a graph with {vertex_count} vertices")]
    OverlappingAnchorGroups {
        anchor_size: usize,
        vertex_count: usize,
    },
    #[error("anchor size {anchor_size} is not in [1, {vertex_count}/2) for a graph with {vertex_count} vertices")]
    AnchorSizeOutOfRange {
        anchor_size: usize,
        vertex_count: usize,
    },
    #[error("projection order does not list each of the {vertex_count} vertices exactly once")]
    InvalidOrder { vertex_count: usize },
    #[error("projection line is degenerate, {a} and {b} coincide")]
    DegenerateLine { a: Point, b: Point },
    #[error("invalid value `{value}` for parameter `{key}`")]
    InvalidParameter { key: String, value: String },
    #[error("unknown partitioning algorithm `{0}`")]
    UnknownAlgorithm(String),
}

/// Broken residual graph. Only produced by a bug in the flow computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("flow {flow} on edge {edge} is outside [0, {capacity}]")]
    FlowOutOfRange { edge: usize, flow: i64, capacity: i64 },
    #[error("flow {flow} on edge {edge} is not mirrored by its reverse edge ({reverse_flow})")]
    UnmirroredFlow {
        edge: usize,
        flow: i64,
        reverse_flow: i64,
    },
}
