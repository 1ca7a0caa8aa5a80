use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::graph::RoadNetwork;
use crate::inertial::{InertialFlow, InertialFlowConfig};
use crate::partition::Partition;

/// Common interface of the two-way partitioning algorithms.
pub trait Partitioner {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn bisect(&self, network: &RoadNetwork) -> Result<Partition, ConfigError>;
}

impl Partitioner for InertialFlow {
    fn name(&self) -> &'static str {
        AlgorithmKind::InertialFlow.name()
    }

    fn description(&self) -> &'static str {
        "Orders the vertices along a line and cuts between both ends with a maximum flow"
    }

    fn bisect(&self, network: &RoadNetwork) -> Result<Partition, ConfigError> {
        InertialFlow::partition(self, network).map(|bisection| bisection.partition)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlgorithmKind {
    InertialFlow,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 1] = [AlgorithmKind::InertialFlow];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::InertialFlow => "Inertial Flow",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigError::UnknownAlgorithm(name.to_owned()))
    }
}

pub type Factory = fn(&HashMap<String, String>) -> Result<Box<dyn Partitioner>, ConfigError>;

fn inertial_flow(parameters: &HashMap<String, String>) -> Result<Box<dyn Partitioner>, ConfigError> {
    let config = InertialFlowConfig::from_parameters(parameters)?;
    config.validate()?;
    Ok(Box::new(InertialFlow::new(config)))
}

/// Table of the algorithms available to a caller, built explicitly instead of
/// being discovered at run time.
pub struct Registry {
    factories: BTreeMap<AlgorithmKind, Factory>,
}

impl Registry {
    pub fn builtin() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };
        registry.register(AlgorithmKind::InertialFlow, inertial_flow);
        registry
    }

    pub fn register(&mut self, kind: AlgorithmKind, factory: Factory) {
        self.factories.insert(kind, factory);
    }

    pub fn kinds(&self) -> impl Iterator<Item = AlgorithmKind> + '_ {
        self.factories.keys().copied()
    }

    pub fn create(
        &self,
        kind: AlgorithmKind,
        parameters: &HashMap<String, String>,
    ) -> Result<Box<dyn Partitioner>, ConfigError> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(kind.name().to_owned()))?;
        factory(parameters)
    }

    pub fn create_by_name(
        &self,
        name: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<Box<dyn Partitioner>, ConfigError> {
        self.create(name.parse()?, parameters)
    }
}
