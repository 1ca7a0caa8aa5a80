use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::RoadNetwork;

/// Tolerance under which two coordinates along the line count as equal.
pub const EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn minus(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal projection of a vertex onto a [`ProjectionLine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// The projected point itself.
    pub point: Point,
    /// Signed distance from `a` towards `b` along the line.
    pub along: f64,
    /// Signed distance of the original point from the line, positive on the left of `a -> b`.
    pub offset: f64,
}

impl ProjectedPoint {
    /// Whether `self` may be placed directly before `other` in the order.
    ///
    /// Equal positions (within [`EPSILON`]) on both keys count as preceding, so
    /// earlier inserted points stay in front of later ones.
    fn precedes(&self, other: &ProjectedPoint) -> bool {
        if (self.along - other.along).abs() < EPSILON {
            self.offset < other.offset || (self.offset - other.offset).abs() < EPSILON
        } else {
            self.along < other.along
        }
    }
}

/// Line through two distinct points used to order the vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionLine {
    a: Point,
    b: Point,
    direction: Point,
    length_squared: f64,
}

impl ProjectionLine {
    pub fn new(a: Point, b: Point) -> Result<Self, ConfigError> {
        let direction = b.minus(a);
        let length_squared = direction.dot(direction);
        if !length_squared.is_finite() || length_squared == 0.0 {
            return Err(ConfigError::DegenerateLine { a, b });
        }
        Ok(Self {
            a,
            b,
            direction,
            length_squared,
        })
    }

    pub fn a(&self) -> Point {
        self.a
    }

    pub fn b(&self) -> Point {
        self.b
    }

    pub fn project(&self, p: Point) -> ProjectedPoint {
        let relative = p.minus(self.a);
        let t = relative.dot(self.direction) / self.length_squared;
        let length = self.length_squared.sqrt();
        ProjectedPoint {
            point: Point::new(
                self.a.x + t * self.direction.x,
                self.a.y + t * self.direction.y,
            ),
            along: t * length,
            offset: self.direction.cross(relative) / length,
        }
    }
}

impl Default for ProjectionLine {
    fn default() -> Self {
        Self {
            a: Point::new(0.0, 0.0),
            b: Point::new(1.0, 0.0),
            direction: Point::new(1.0, 0.0),
            length_squared: 1.0,
        }
    }
}

/// Projects every vertex of `network` onto `line` and returns them ordered
/// along it.
///
/// This is a plain insertion sort: the comparison uses a tolerance and is not
/// transitive, so it must not be handed to `slice::sort_by`. Vertices are
/// inserted in index order and the result is identical across runs.
pub fn order_vertices(
    network: &RoadNetwork,
    line: &ProjectionLine,
) -> Vec<(NodeIndex, ProjectedPoint)> {
    let mut order: Vec<(NodeIndex, ProjectedPoint)> = Vec::with_capacity(network.vertex_count());
    for (vertex, data) in network.vertices() {
        let projected = line.project(data.position);
        // scan from the back for the last element allowed in front of the new one
        let position = order
            .iter()
            .rposition(|(_, placed)| placed.precedes(&projected))
            .map_or(0, |i| i + 1);
        order.insert(position, (vertex, projected));
    }
    order
}
