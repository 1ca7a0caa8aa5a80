//! Balanced bisection of road networks with Inertial Flow: vertices are
//! ordered along a line, the extreme ends are fixed as source and sink, and a
//! maximum flow between them decides where everything else goes.

pub mod cuts;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod inertial;
pub mod node;
pub mod partition;
pub mod registry;

pub use error::{ConfigError, InvariantViolation};
pub use geometry::Point;
pub use graph::RoadNetwork;
pub use inertial::{Bisection, InertialFlow, InertialFlowConfig};
pub use partition::{Part, Partition};
pub use registry::{AlgorithmKind, Partitioner, Registry};
