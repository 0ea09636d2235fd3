//! Turns an ordered collection of incident records into an incident graph.
//!
//! Every distinct coordinate becomes a node. Consecutive records (in the
//! order they are handed in) are connected by an edge whose weight is the
//! severity of the first record of the pair. Records without a usable
//! coordinate are left out before pairs are formed, so the records on either
//! side of a gap become neighbors.
use std::time::Instant;

use incident_reader::IncidentRecord;
use log::{debug, info};

use crate::{
    aggregation_params::AggregationParams,
    constants::Weight,
    graph::{Edge, Graph, NodeIndex},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregationStats {
    pub records_seen: usize,
    /// Records without a finite coordinate
    pub records_skipped: usize,
    /// Consecutive records at the same location
    pub self_loops_skipped: usize,
    /// Record pairs that hit an already existing edge
    pub edges_merged: usize,
}

pub struct IncidentAggregator {
    params: AggregationParams,
    pub stats: AggregationStats,
}

impl IncidentAggregator {
    pub fn new(params: AggregationParams) -> Self {
        IncidentAggregator {
            params,
            stats: AggregationStats::default(),
        }
    }

    pub fn params(&self) -> &AggregationParams {
        &self.params
    }

    /// Builds a fresh graph from `records`.
    pub fn build<'r, I>(&mut self, records: I) -> Graph
    where
        I: IntoIterator<Item = &'r IncidentRecord>,
    {
        self.stats = AggregationStats::default();
        let now = Instant::now();
        info!(
            "BEGIN aggregating incidents (merge policy: {}, severity: {})",
            self.params.merge_policy, self.params.severity
        );

        let mut g = Graph::new();
        // Node and severity of the previous valid record
        let mut previous: Option<(NodeIndex, Weight)> = None;

        for (i, record) in records.into_iter().enumerate() {
            self.stats.records_seen += 1;

            let Some(coordinate) = record.coordinate() else {
                debug!("Skipping record {} without valid coordinate", i);
                self.stats.records_skipped += 1;
                continue;
            };

            let node_idx = g.add_node(coordinate);
            if let Some(node) = g.node_mut(node_idx) {
                node.incidents += 1;
            }

            if let Some((prev_idx, weight)) = previous {
                if prev_idx == node_idx {
                    self.stats.self_loops_skipped += 1;
                } else {
                    if g.find_edge(prev_idx, node_idx).is_some() {
                        self.stats.edges_merged += 1;
                    }
                    g.merge_edge(
                        Edge::new(prev_idx, node_idx, weight),
                        self.params.merge_policy,
                    );
                }
            }

            previous = Some((
                node_idx,
                record.severity_count(self.params.severity) as Weight,
            ));
        }

        info!("FINISHED aggregating. Took {:?}", now.elapsed());
        info!(
            "{} ({} of {} records skipped, {} edges merged)",
            g, self.stats.records_skipped, self.stats.records_seen, self.stats.edges_merged
        );

        g
    }
}

/// Returns a copy of `records` with every coordinate rounded to `decimals`
/// decimal places, at most [`incident_reader::MAX_DECIMALS`]. Rounding
/// merges locations that only differ below that precision into one node when
/// the result is aggregated.
pub fn snap_coordinates(records: &[IncidentRecord], decimals: u32) -> Vec<IncidentRecord> {
    records
        .iter()
        .map(|record| match record.coordinate() {
            Some(coordinate) => {
                let snapped = coordinate.rounded(decimals);
                IncidentRecord {
                    latitude: Some(snapped.lat),
                    longitude: Some(snapped.lon),
                    ..record.clone()
                }
            }
            None => record.clone(),
        })
        .collect()
}
