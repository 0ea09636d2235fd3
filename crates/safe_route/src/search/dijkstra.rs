use std::{cmp::Ordering, collections::BinaryHeap};

use crate::constants::Weight;
use crate::graph::*;
use crate::search::shortest_path::ShortestPath;
use crate::statistics::SearchStats;
use log::{debug, info};
use rustc_hash::FxHashMap;

/// Queue entry. Ordered so that the `BinaryHeap` pops the lowest weight
/// first and, among equal weights, the lowest node index.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Candidate<Idx = DefaultIdx> {
    pub(crate) node_idx: NodeIndex<Idx>,
    pub(crate) weight: Weight,
}

impl Candidate {
    pub(crate) fn new(node_idx: NodeIndex, weight: Weight) -> Self {
        Self { node_idx, weight }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

pub struct Dijkstra<'a, Idx = DefaultIdx> {
    pub stats: SearchStats,
    g: &'a Graph<Idx>,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Dijkstra {
            g: graph,
            stats: SearchStats::default(),
        }
    }

    /// Computes a minimum weight path from `source` to `target`.
    ///
    /// Returns `None` if `target` is not reachable. A predecessor is only
    /// replaced on a strict improvement, so equal-weight alternatives always
    /// resolve to the same path for the same graph.
    pub fn search(&mut self, source: NodeIndex, target: NodeIndex) -> Option<ShortestPath> {
        self.stats.init();

        if source == target {
            self.stats.nodes_settled += 1;
            self.stats.finish();
            return Some(ShortestPath::new(vec![source], 0));
        }

        let mut node_data: FxHashMap<NodeIndex, (Weight, Option<NodeIndex>)> = FxHashMap::default();
        node_data.insert(source, (0, None));

        let mut queue = BinaryHeap::new();

        queue.push(Candidate::new(source, 0));

        while let Some(Candidate { weight, node_idx }) = queue.pop() {
            // Skip outdated queue entries
            if node_data
                .get(&node_idx)
                .is_some_and(|(best, _)| weight > *best)
            {
                continue;
            }

            self.stats.nodes_settled += 1;

            if node_idx == target {
                break;
            }

            for (_, edge) in self.g.neighbors(node_idx) {
                let new_distance = weight + edge.weight;
                let improves = node_data
                    .get(&edge.target)
                    .map_or(true, |(best, _)| new_distance < *best);
                if improves {
                    node_data.insert(edge.target, (new_distance, Some(node_idx)));
                    queue.push(Candidate::new(edge.target, new_distance));
                }
            }
        }
        self.stats.finish();

        let sp = super::reconstruct_path(target, source, &node_data);
        if sp.is_some() {
            debug!("Path found: {:?}", sp);
            info!("Path found: {}", self.stats);
        } else {
            info!("No path found: {}", self.stats);
        }

        sp
    }
}
