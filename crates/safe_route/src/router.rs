//! Safest route between two incident locations.
//!
//! The router works on a finished incident graph and never modifies it. Both
//! endpoints have to be locations that occur in the graph exactly; there is no
//! snapping to the nearest node.
use std::{fmt, path::Path};

use anyhow::Context;
use incident_reader::Coordinate;
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::{
    constants::Weight,
    graph::Graph,
    search::dijkstra::Dijkstra,
    statistics::SearchStats,
    util::math::haversine_distance,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("{endpoint} {coordinate} is not a recorded incident location")]
    NodeNotFound {
        endpoint: Endpoint,
        coordinate: Coordinate,
    },
    #[error("no route connects {origin} and {destination}")]
    NoPath {
        origin: Coordinate,
        destination: Coordinate,
    },
}

/// Ordered locations from origin to destination with the summed severity
/// of the edges in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePath {
    pub coordinates: Vec<Coordinate>,
    pub weight: Weight,
}

impl RoutePath {
    pub fn origin(&self) -> Option<&Coordinate> {
        self.coordinates.first()
    }

    pub fn destination(&self) -> Option<&Coordinate> {
        self.coordinates.last()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Great-circle length of the polyline in metres
    pub fn length_m(&self) -> f64 {
        self.coordinates
            .windows(2)
            .map(|pair| haversine_distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Writes the path as `seq,lat,lon` rows for the map layer.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        wtr.write_record(["seq", "lat", "lon"])?;
        for (seq, coordinate) in self.coordinates.iter().enumerate() {
            wtr.write_record(&[
                seq.to_string(),
                coordinate.lat.to_string(),
                coordinate.lon.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for coordinate in &self.coordinates {
            writeln!(f, "{}", coordinate)?;
        }
        write!(
            f,
            "Severity: {}, length: {:.0} m",
            self.weight,
            self.length_m()
        )
    }
}

pub struct SafetyRouter<'a> {
    graph: &'a Graph,
    dijkstra: Dijkstra<'a>,
}

impl<'a> SafetyRouter<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        SafetyRouter {
            graph,
            dijkstra: Dijkstra::new(graph),
        }
    }

    /// Statistics of the last search
    pub fn stats(&self) -> &SearchStats {
        &self.dijkstra.stats
    }

    /// Returns the path of minimal total severity from `origin` to `destination`.
    pub fn route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutePath, RouteError> {
        let source = self
            .graph
            .node_index_of(&origin)
            .ok_or(RouteError::NodeNotFound {
                endpoint: Endpoint::Origin,
                coordinate: origin,
            })?;
        let target = self
            .graph
            .node_index_of(&destination)
            .ok_or(RouteError::NodeNotFound {
                endpoint: Endpoint::Destination,
                coordinate: destination,
            })?;

        let sp = self
            .dijkstra
            .search(source, target)
            .ok_or(RouteError::NoPath {
                origin,
                destination,
            })?;

        let coordinates = sp
            .nodes
            .iter()
            .filter_map(|node_idx| self.graph.coordinate(*node_idx))
            .collect();

        let path = RoutePath {
            coordinates,
            weight: sp.weight,
        };
        info!(
            "Route {} -> {}: {} locations, severity {}",
            origin,
            destination,
            path.len(),
            path.weight
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use crate::{
        graph::{node_index, Edge, NodeIndex},
        util::test_graphs::{
            a, b, c, example_graph, example_graph_with_shortcut, graph_corrientes, init_log,
        },
    };

    use super::*;

    #[test]
    fn route_along_chain() {
        let g = example_graph();
        let mut router = SafetyRouter::new(&g);

        let path = router.route(a(), c()).unwrap();

        assert_eq!(path.coordinates, vec![a(), b(), c()]);
        assert_eq!(path.weight, 3);
        assert_eq!(path.origin(), Some(&a()));
        assert_eq!(path.destination(), Some(&c()));
    }

    #[test]
    fn safer_detour_beats_direct_shortcut() {
        let g = example_graph_with_shortcut();
        let mut router = SafetyRouter::new(&g);

        let path = router.route(a(), c()).unwrap();
        assert_eq!(path.coordinates, vec![a(), b(), c()]);
        assert_eq!(path.weight, 3);

        let path = router.route(c(), a()).unwrap();
        assert_eq!(path.coordinates, vec![c(), b(), a()]);
        assert_eq!(path.weight, 3);
    }

    #[test]
    fn origin_equals_destination() {
        let g = example_graph();
        let mut router = SafetyRouter::new(&g);

        let path = router.route(b(), b()).unwrap();
        assert_eq!(path.coordinates, vec![b()]);
        assert_eq!(path.weight, 0);
        assert_eq!(path.length_m(), 0.0);
    }

    #[test]
    fn unknown_endpoints() {
        let g = example_graph();
        let mut router = SafetyRouter::new(&g);
        let unknown = Coordinate::new(-27.481, -58.83);

        assert_eq!(
            router.route(unknown, c()),
            Err(RouteError::NodeNotFound {
                endpoint: Endpoint::Origin,
                coordinate: unknown,
            })
        );
        assert_eq!(
            router.route(a(), unknown),
            Err(RouteError::NodeNotFound {
                endpoint: Endpoint::Destination,
                coordinate: unknown,
            })
        );
        // Origin is reported first if both are missing
        assert!(matches!(
            router.route(unknown, unknown),
            Err(RouteError::NodeNotFound {
                endpoint: Endpoint::Origin,
                ..
            })
        ));
        // NaN never matches a node
        assert!(matches!(
            router.route(Coordinate::new(f64::NAN, -58.83), a()),
            Err(RouteError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn disconnected_components() {
        let mut g = example_graph();
        let d = g.add_node(Coordinate::new(-27.60, -58.90));
        let e = g.add_node(Coordinate::new(-27.61, -58.91));
        g.add_edge(Edge::new(d, e, 1));

        let mut router = SafetyRouter::new(&g);
        let destination = Coordinate::new(-27.61, -58.91);

        assert_eq!(
            router.route(a(), destination),
            Err(RouteError::NoPath {
                origin: a(),
                destination,
            })
        );

        // The graph is still usable after a failed request
        assert_eq!(router.route(a(), c()).map(|p| p.weight), Ok(3));
    }

    #[test]
    fn route_on_sample_dataset() {
        init_log();
        let g = graph_corrientes();
        let mut router = SafetyRouter::new(&g);

        let g_loc = Coordinate::new(-27.52, -58.87);
        let path = router.route(a(), g_loc).unwrap();

        // A -2- B -2- E -0- F -3- G
        assert_eq!(
            path.coordinates,
            vec![
                a(),
                b(),
                Coordinate::new(-27.46, -58.81),
                Coordinate::new(-27.51, -58.86),
                g_loc,
            ]
        );
        assert_eq!(path.weight, 7);
        assert!(router.stats().duration.is_some());

        // C -1- B -2- A is safer than C -5- A and C -4- D -0- A
        let path = router.route(c(), a()).unwrap();
        assert_eq!(path.coordinates, vec![c(), b(), a()]);
        assert_eq!(path.weight, 3);
    }

    #[test]
    fn route_length() {
        let g = example_graph();
        let mut router = SafetyRouter::new(&g);

        let path = router.route(a(), c()).unwrap();
        let expected = haversine_distance(&a(), &b()) + haversine_distance(&b(), &c());

        assert_abs_diff_eq!(path.length_m(), expected, epsilon = 1e-6);
        assert!(path.length_m() > 2500.0 && path.length_m() < 3500.0);
    }

    #[test]
    fn write_csv_works() {
        let g = example_graph();
        let path = SafetyRouter::new(&g).route(a(), c()).unwrap();

        let file = std::env::temp_dir().join("safe_route_write_csv_works.csv");
        path.write_csv(&file).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "seq,lat,lon\n0,-27.48,-58.83\n1,-27.49,-58.84\n2,-27.5,-58.85\n"
        );
    }

    /// Weight of the cheapest simple path, found by enumerating all of them.
    fn brute_force(g: &Graph, source: NodeIndex, target: NodeIndex) -> Option<Weight> {
        fn visit(
            g: &Graph,
            node: NodeIndex,
            target: NodeIndex,
            weight: Weight,
            visited: &mut Vec<bool>,
            best: &mut Option<Weight>,
        ) {
            if node == target {
                *best = Some(best.map_or(weight, |b| b.min(weight)));
                return;
            }
            visited[node.index()] = true;
            for (_, edge) in g.neighbors(node) {
                if !visited[edge.target.index()] {
                    visit(g, edge.target, target, weight + edge.weight, visited, best);
                }
            }
            visited[node.index()] = false;
        }

        let mut best = None;
        let mut visited = vec![false; g.num_nodes()];
        visit(g, source, target, 0, &mut visited, &mut best);
        best
    }

    fn random_graph(num_nodes: usize, edges: &[(usize, usize, Weight)]) -> Graph {
        let mut g = Graph::new();
        for i in 0..num_nodes {
            g.add_node(Coordinate::new(-27.4 - i as f64 * 0.01, -58.8 + i as f64 * 0.01));
        }
        for &(s, t, w) in edges {
            let (s, t) = (s % num_nodes, t % num_nodes);
            if s != t {
                g.add_edge(Edge::new(node_index(s), node_index(t), w));
            }
        }
        g
    }

    #[test]
    fn route_is_never_heavier_than_any_simple_path() {
        let mut runner = proptest::test_runner::TestRunner::default();

        let strategy = (
            2usize..8,
            prop::collection::vec((0usize..8, 0usize..8, 0u64..10), 0..16),
            0usize..8,
            0usize..8,
        );

        runner
            .run(&strategy, |(num_nodes, edges, s, t)| {
                let g = random_graph(num_nodes, &edges);
                let (s, t) = (node_index(s % num_nodes), node_index(t % num_nodes));
                let origin = g.coordinate(s).unwrap();
                let destination = g.coordinate(t).unwrap();

                let result = SafetyRouter::new(&g).route(origin, destination);

                match brute_force(&g, s, t) {
                    Some(best) => {
                        let path = result.expect("route exists");
                        prop_assert_eq!(path.weight, best);
                        prop_assert_eq!(path.origin(), Some(&origin));
                        prop_assert_eq!(path.destination(), Some(&destination));

                        // Consecutive locations are joined by edges whose weights add up
                        let mut total = 0;
                        for pair in path.coordinates.windows(2) {
                            let u = g.node_index_of(&pair[0]).unwrap();
                            let v = g.node_index_of(&pair[1]).unwrap();
                            let edge_idx = g.find_edge(u, v);
                            prop_assert!(edge_idx.is_some());
                            total += g.edges[edge_idx.unwrap().index()].weight;
                        }
                        prop_assert_eq!(total, path.weight);
                    }
                    None => {
                        let is_no_path = matches!(result, Err(RouteError::NoPath { .. }));
                        prop_assert!(is_no_path);
                    }
                }
                Ok(())
            })
            .unwrap();
    }
}
