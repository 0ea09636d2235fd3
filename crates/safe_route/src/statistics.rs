use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use histogram::Histogram;

use crate::graph::{node_index, Graph};

#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    pub nodes_settled: usize,
    pub duration: Option<Duration>,
    start_time: Option<Instant>,
}

impl SearchStats {
    pub fn init(&mut self) {
        self.nodes_settled = 0;
        self.duration = None;
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        if let Some(start_time) = self.start_time {
            self.duration = Some(start_time.elapsed());
        }
    }
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes settled in {:?}",
            self.nodes_settled, self.duration
        )
    }
}

/// Histogram over the number of incident edges per node
pub fn degree_hist(g: &Graph) -> Histogram {
    let hist = Histogram::new(0, 10, 30).expect("Invalid histogram parameters");
    for node in 0..g.nodes.len() {
        let degree = g.degree(node_index(node));
        hist.increment(degree as u64, 1)
            .expect("Node degree exceeds histogram range");
    }
    hist
}

pub fn average_degree(g: &Graph) -> f64 {
    if g.nodes.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0;
    for node in 0..g.nodes.len() {
        sum += g.degree(node_index(node)) as f64;
    }
    sum / g.nodes.len() as f64
}

/// Assigns every node the id of its connected component. Ids are dense and
/// numbered in order of the lowest node index of each component.
pub fn connected_components(g: &Graph) -> Vec<usize> {
    const UNVISITED: usize = usize::MAX;

    let mut component = vec![UNVISITED; g.nodes.len()];
    let mut next_id = 0;
    let mut stack = Vec::new();

    for start in 0..g.nodes.len() {
        if component[start] != UNVISITED {
            continue;
        }
        component[start] = next_id;
        stack.push(node_index(start));

        while let Some(node) = stack.pop() {
            for (_, edge) in g.neighbors(node) {
                if component[edge.target.index()] == UNVISITED {
                    component[edge.target.index()] = next_id;
                    stack.push(edge.target);
                }
            }
        }
        next_id += 1;
    }

    component
}

pub fn num_components(g: &Graph) -> usize {
    connected_components(g)
        .into_iter()
        .max()
        .map_or(0, |max_id| max_id + 1)
}
