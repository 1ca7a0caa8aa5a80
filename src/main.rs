use std::collections::HashMap;

use inertial_flow::{Part, Registry, RoadNetwork};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Grid of junctions with jittered positions and a few missing roads, a rough
/// stand-in for a city street map.
fn street_grid(rows: usize, columns: usize, rng: &mut impl Rng) -> RoadNetwork {
    let mut network = RoadNetwork::new();
    let mut junctions = Vec::with_capacity(rows * columns);
    for r in 0..rows {
        for c in 0..columns {
            let x = c as f64 + rng.gen_range(-0.3..0.3);
            let y = r as f64 + rng.gen_range(-0.3..0.3);
            junctions.push(network.add_vertex(x, y));
        }
    }
    for r in 0..rows {
        for c in 0..columns {
            let here = junctions[r * columns + c];
            if c + 1 < columns && rng.gen_bool(0.9) {
                network.add_two_way_road(here, junctions[r * columns + c + 1]);
            }
            if r + 1 < rows && rng.gen_bool(0.9) {
                network.add_two_way_road(here, junctions[(r + 1) * columns + c]);
            }
        }
    }
    network
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = StdRng::seed_from_u64(7);
    let network = street_grid(20, 30, &mut rng);

    // diagonal line through the grid
    let parameters: HashMap<String, String> = [
        ("LineAX", "0"),
        ("LineAY", "0"),
        ("LineBX", "3"),
        ("LineBY", "2"),
        ("Balance", "0.25"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect();

    let registry = Registry::builtin();
    for kind in registry.kinds() {
        let algorithm = match registry.create(kind, &parameters) {
            Ok(algorithm) => algorithm,
            Err(error) => {
                error!(%kind, %error, "failed to create partitioner");
                continue;
            }
        };
        info!(algorithm = algorithm.name(), "{}", algorithm.description());

        match algorithm.bisect(&network) {
            Ok(partition) => info!(
                vertices = network.vertex_count(),
                roads = network.road_count(),
                part_zero = partition.count(Part::Zero),
                part_one = partition.count(Part::One),
                cut_weight = partition.cut_weight(&network),
                "bisected street grid"
            ),
            Err(error) => error!(%kind, %error, "bisection failed"),
        }
    }
}
