use std::path::Path;

use incident_reader::{load_csv, Coordinate, IncidentRecord};

use crate::{
    aggregation_params::AggregationParams,
    aggregator::IncidentAggregator,
    graph::{Edge, Graph},
};

pub fn a() -> Coordinate {
    Coordinate::new(-27.48, -58.83)
}

pub fn b() -> Coordinate {
    Coordinate::new(-27.49, -58.84)
}

pub fn c() -> Coordinate {
    Coordinate::new(-27.50, -58.85)
}

pub fn example_graph() -> Graph {
    // A --2-- B --1-- C
    let mut g = Graph::new();

    let a = g.add_node(a());
    let b = g.add_node(b());
    let c = g.add_node(c());

    g.add_edge(Edge::new(a, b, 2));
    g.add_edge(Edge::new(b, c, 1));

    g
}

pub fn example_graph_with_shortcut() -> Graph {
    // A --2-- B --1-- C
    //  \______10_____/
    let mut g = example_graph();

    let a = g.add_node(a());
    let c = g.add_node(c());
    g.add_edge(Edge::new(a, c, 10));

    g
}

/// Records of `incident_reader/test_data/siniestros.csv`
pub fn corrientes_records() -> Vec<IncidentRecord> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../incident_reader/test_data/siniestros.csv");

    load_csv(&path).expect("Failed to load sample dataset")
}

/// Incident graph of the sample dataset with default parameters
pub fn graph_corrientes() -> Graph {
    IncidentAggregator::new(AggregationParams::default()).build(&corrientes_records())
}

pub fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}
