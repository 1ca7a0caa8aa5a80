use std::collections::HashMap;
use std::str::FromStr;

use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::cuts::{anchor_size, FlowNetwork, MinCut};
use crate::error::ConfigError;
use crate::geometry::{order_vertices, Point, ProjectionLine};
use crate::graph::RoadNetwork;
use crate::partition::{assemble, Part, Partition};

/// Parameters of an Inertial Flow bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertialFlowConfig {
    /// First point of the projection line.
    pub line_a: Point,
    /// Second point of the projection line.
    pub line_b: Point,
    /// Fraction of vertices fixed to each side, in (0, 0.5).
    pub balance: f64,
}

impl Default for InertialFlowConfig {
    fn default() -> Self {
        Self {
            line_a: Point::new(0.0, 0.0),
            line_b: Point::new(1.0, 0.0),
            balance: 0.25,
        }
    }
}

impl InertialFlowConfig {
    pub const LINE_A_X: &'static str = "LineAX";
    pub const LINE_A_Y: &'static str = "LineAY";
    pub const LINE_B_X: &'static str = "LineBX";
    pub const LINE_B_Y: &'static str = "LineBY";
    pub const BALANCE: &'static str = "Balance";

    /// Reads a configuration from string parameters.
    ///
    /// The line is only taken over when all four coordinates are present,
    /// otherwise it stays at the default. Unknown keys are ignored.
    pub fn from_parameters(parameters: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let line_keys = [Self::LINE_A_X, Self::LINE_A_Y, Self::LINE_B_X, Self::LINE_B_Y];
        if line_keys.iter().all(|key| parameters.contains_key(*key)) {
            let [ax, ay, bx, by] = line_keys.map(|key| parse(parameters, key));
            config.line_a = Point::new(ax?, ay?);
            config.line_b = Point::new(bx?, by?);
        }
        if parameters.contains_key(Self::BALANCE) {
            config.balance = parse(parameters, Self::BALANCE)?;
        }

        Ok(config)
    }

    /// Checks the parts of the configuration that do not depend on the graph
    /// and returns the projection line.
    pub fn validate(&self) -> Result<ProjectionLine, ConfigError> {
        if !(self.balance > 0.0 && self.balance < 0.5) {
            return Err(ConfigError::BalanceOutOfRange(self.balance));
        }
        ProjectionLine::new(self.line_a, self.line_b)
    }
}

fn parse<T: FromStr>(parameters: &HashMap<String, String>, key: &str) -> Result<T, ConfigError> {
    let value = parameters.get(key).map(String::as_str).unwrap_or_default();
    value.trim().parse().map_err(|_| ConfigError::InvalidParameter {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

/// Outcome of a single bisection.
#[derive(Debug, Clone, PartialEq)]
pub struct Bisection {
    pub partition: Partition,
    /// Value of the maximum flow between the anchors, equal to the capacity of
    /// the minimum cut.
    pub flow_value: i64,
    /// Number of vertices fixed to each side.
    pub anchor_size: usize,
}

/// Two-way partitioning of a road network by projection onto a line followed
/// by a minimum cut between the extreme vertices.
///
/// Every call works on its own derived state, so one instance can bisect any
/// number of networks.
#[derive(Debug, Clone, Default)]
pub struct InertialFlow {
    config: InertialFlowConfig,
}

impl InertialFlow {
    pub fn new(config: InertialFlowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InertialFlowConfig {
        &self.config
    }

    /// Bisects `network`.
    ///
    /// A network without vertices yields an empty partition. Configuration
    /// errors, including a balance too small or too large for the number of
    /// vertices, are reported before any projection or flow work.
    ///
    /// # Panics
    ///
    /// If the residual graph ends up inconsistent after the flow computation,
    /// which means a bug in the solver.
    pub fn partition(&self, network: &RoadNetwork) -> Result<Bisection, ConfigError> {
        let line = self.config.validate()?;
        if network.is_empty() {
            debug!("empty road network, nothing to bisect");
            return Ok(Bisection {
                partition: Partition::empty(),
                flow_value: 0,
                anchor_size: 0,
            });
        }

        let _span = debug_span!(
            "inertial_flow",
            vertices = network.vertex_count(),
            roads = network.road_count()
        )
        .entered();
        let anchor_size = anchor_size(self.config.balance, network.vertex_count())?;

        let order: Vec<NodeIndex> = order_vertices(network, &line)
            .into_iter()
            .map(|(vertex, _)| vertex)
            .collect_vec();
        debug!(anchor_size, "projected vertices onto {} -> {}", line.a(), line.b());

        let mut flow = FlowNetwork::build(network, &order, anchor_size)?;
        debug!(
            nodes = flow.graph().node_count(),
            edges = flow.graph().edge_count(),
            "built flow network"
        );

        let flow_value = flow.max_flow();
        if let Err(violation) = flow.check_residual_invariant() {
            panic!("residual graph is inconsistent after max flow: {violation}");
        }
        debug!(flow_value, "computed maximum flow");

        let cut = MinCut::new(&flow);
        debug_assert_eq!(flow_value, cut.capacity);
        let partition = assemble(network, &flow, &cut);
        debug!(
            part_zero = partition.count(Part::Zero),
            part_one = partition.count(Part::One),
            cut_edges = cut.cut_set.len(),
            "assembled partition"
        );

        Ok(Bisection {
            partition,
            flow_value,
            anchor_size,
        })
    }
}
