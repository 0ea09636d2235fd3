use crate::{aggregation_params::MergePolicy, constants::Weight};
use anyhow::Context;
use incident_reader::Coordinate;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, path::Path};

/// Default integer typer for node and edge indices
pub type DefaultIdx = u32;

pub trait IndexType: Copy + Default + Hash + Ord + fmt::Debug {
    fn new(idx: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

impl IndexType for u32 {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u32
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u32::MAX
    }
}

/// Node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct NodeIndex<Idx = DefaultIdx>(Idx);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    #[inline]
    pub fn end() -> Self {
        NodeIndex(IndexType::max())
    }
}

impl<Idx: IndexType> From<Idx> for NodeIndex<Idx> {
    fn from(ix: Idx) -> Self {
        NodeIndex(ix)
    }
}

/// Short version of `NodeIndex::new`
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Edge identifier.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize,
)]
pub struct EdgeIndex<Idx = DefaultIdx>(Idx);

impl<Idx: IndexType> From<Idx> for EdgeIndex<Idx> {
    fn from(ix: Idx) -> Self {
        EdgeIndex(ix)
    }
}

impl<Idx: IndexType> EdgeIndex<Idx> {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    #[inline]
    pub fn end() -> Self {
        EdgeIndex(IndexType::max())
    }
}

/// A location where at least one incident was recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub coordinate: Coordinate,
    /// Number of records observed at this location
    pub incidents: u32,
}

impl Node {
    pub fn new(coordinate: Coordinate) -> Self {
        Node {
            coordinate,
            incidents: 0,
        }
    }
}

/// Undirected edge. `source` and `target` only reflect the order in which the
/// edge was first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<Idx = DefaultIdx> {
    pub source: NodeIndex<Idx>,
    pub target: NodeIndex<Idx>,
    pub weight: Weight,
}

impl Edge {
    pub fn new(source: NodeIndex, target: NodeIndex, weight: Weight) -> Self {
        Edge {
            source,
            target,
            weight,
        }
    }

    pub(crate) fn reverse(&self) -> Self {
        Edge {
            source: self.target,
            target: self.source,
            weight: self.weight,
        }
    }

    /// Returns the opposite end of the edge as seen from `node`.
    pub fn other(&self, node: NodeIndex) -> NodeIndex {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }

    fn connects(&self, a: NodeIndex, b: NodeIndex) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Undirected weighted graph whose nodes are identified by their coordinate.
#[derive(Clone)]
pub struct Graph<Idx = DefaultIdx> {
    pub adjacency: Vec<Vec<EdgeIndex<Idx>>>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge<Idx>>,
    node_lookup: FxHashMap<Coordinate, NodeIndex<Idx>>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            adjacency: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            node_lookup: FxHashMap::default(),
        }
    }

    pub fn with_capacity(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            adjacency: Vec::with_capacity(num_nodes),
            nodes: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_edges),
            node_lookup: FxHashMap::with_capacity_and_hasher(num_nodes, Default::default()),
        }
    }

    /// Returns the node at `coordinate`, creating it if it does not exist yet.
    ///
    /// **Panics** if the Graph is at the maximum number of nodes for its index
    /// type
    pub fn add_node(&mut self, coordinate: Coordinate) -> NodeIndex {
        if let Some(node_idx) = self.node_lookup.get(&coordinate) {
            return *node_idx;
        }

        let node_idx: NodeIndex = NodeIndex::new(self.nodes.len());

        assert!(
            NodeIndex::end() != node_idx,
            "Maximum number of nodes for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        // Create new entry in adjacency list for new node
        self.adjacency.push(Vec::new());
        self.nodes.push(Node::new(coordinate));
        self.node_lookup.insert(coordinate, node_idx);

        node_idx
    }

    /// Adds `edge`, replacing the weight of an existing edge between the same
    /// two nodes.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeIndex {
        self.merge_edge(edge, MergePolicy::Overwrite)
    }

    /// Add a new `edge` to the graph. If the two nodes are already connected
    /// the weights are combined according to `policy` and the existing edge
    /// is kept.
    ///
    /// **Panics** if the Graph is at the maximum number of edges for its index
    /// type
    /// **Panics** if the source or target node does not exist
    ///
    /// Returns the index of the new or updated edge.
    pub fn merge_edge(&mut self, edge: Edge, policy: MergePolicy) -> EdgeIndex {
        assert!(
            edge.source.index() < self.nodes.len(),
            "Source node index ({}) does not exist",
            edge.source.index()
        );
        assert!(
            edge.target.index() < self.nodes.len(),
            "Target node index ({}) does not exist",
            edge.target.index()
        );

        if let Some(edge_idx) = self.find_edge(edge.source, edge.target) {
            let old_edge = &mut self.edges[edge_idx.index()];
            old_edge.weight = match policy {
                MergePolicy::Overwrite => edge.weight,
                MergePolicy::Accumulate => old_edge.weight.saturating_add(edge.weight),
            };
            return edge_idx;
        }

        let edge_idx = EdgeIndex::new(self.edges.len());

        assert!(
            EdgeIndex::end() != edge_idx,
            "Maximum number of edges for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        self.adjacency[edge.source.index()].push(edge_idx);
        if edge.source != edge.target {
            self.adjacency[edge.target.index()].push(edge_idx);
        }

        self.edges.push(edge);

        edge_idx
    }

    /// Returns the edge connecting `a` and `b` in either direction.
    pub fn find_edge(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.adjacency
            .get(a.index())?
            .iter()
            .find(|edge_idx| self.edges[edge_idx.index()].connects(a, b))
            .copied()
    }

    pub fn node(&self, node_idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(node_idx.index())
    }

    pub(crate) fn node_mut(&mut self, node_idx: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(node_idx.index())
    }

    /// Looks up the node at exactly `coordinate`.
    pub fn node_index_of(&self, coordinate: &Coordinate) -> Option<NodeIndex> {
        self.node_lookup.get(coordinate).copied()
    }

    pub fn coordinate(&self, node_idx: NodeIndex) -> Option<Coordinate> {
        self.node(node_idx).map(|node| node.coordinate)
    }

    /// Returns an iterator over all nodes of the graph
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over all edges of the graph
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, node_idx: NodeIndex) -> usize {
        self.adjacency[node_idx.index()].len()
    }

    /// Edges incident to `node_idx`, each oriented so that `source == node_idx`.
    pub fn neighbors(&self, node_idx: NodeIndex) -> impl Iterator<Item = (EdgeIndex, Edge)> + '_ {
        self.adjacency[node_idx.index()].iter().map(move |edge_idx| {
            let edge = &self.edges[edge_idx.index()];
            if edge.source == node_idx {
                (*edge_idx, edge.clone())
            } else {
                (*edge_idx, edge.reverse())
            }
        })
    }

    /// Heat map intensities: every location with its number of incidents
    pub fn heat_points(&self) -> impl Iterator<Item = (Coordinate, u32)> + '_ {
        self.nodes.iter().map(|node| (node.coordinate, node.incidents))
    }

    /// Writes `nodes.csv` and `edges.csv` into `dir`.
    pub fn export_csv(&self, dir: &Path) -> anyhow::Result<()> {
        let nodes_path = dir.join("nodes.csv");
        let mut wtr = csv::Writer::from_path(&nodes_path)
            .with_context(|| format!("Failed to create {}", nodes_path.display()))?;

        debug!("BEGIN writing nodes");
        wtr.write_record(["lat", "lon", "incidents"])?;
        for node in self.nodes() {
            wtr.write_record(&[
                node.coordinate.lat.to_string(),
                node.coordinate.lon.to_string(),
                node.incidents.to_string(),
            ])?;
        }

        wtr.flush()?;
        debug!("FINISHED writing nodes");

        let edges_path = dir.join("edges.csv");
        let mut wtr = csv::Writer::from_path(&edges_path)
            .with_context(|| format!("Failed to create {}", edges_path.display()))?;
        wtr.write_record([
            "source_lat",
            "source_lon",
            "target_lat",
            "target_lon",
            "weight",
        ])?;
        debug!("BEGIN writing edges");
        for edge in self.edges() {
            let source = &self.nodes[edge.source.index()].coordinate;
            let target = &self.nodes[edge.target.index()].coordinate;
            wtr.write_record(&[
                source.lat.to_string(),
                source.lon.to_string(),
                target.lat.to_string(),
                target.lon.to_string(),
                edge.weight.to_string(),
            ])?;
        }

        wtr.flush()?;
        debug!("FINISHED writing edges");
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IncidentGraph:\t#Nodes: {}, #Edges: {}",
            self.nodes.len(),
            self.edges.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::util::test_graphs::{a, b, c};

    use super::*;

    #[test]
    fn nodes_are_deduplicated_by_coordinate() {
        let mut g = Graph::new();
        let first = g.add_node(a());
        let second = g.add_node(b());
        let again = g.add_node(Coordinate::new(-27.48, -58.83));

        assert_eq!(first, again);
        assert_ne!(first, second);
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.node_index_of(&b()), Some(second));
        assert_eq!(g.node_index_of(&c()), None);
    }

    #[test]
    fn add_duplicate_edges_overwrites() {
        let mut g = Graph::new();
        let a = g.add_node(a());
        let b = g.add_node(b());

        let edge1 = g.add_edge(Edge::new(a, b, 2));
        let edge2 = g.add_edge(Edge::new(b, a, 5));

        assert_eq!(edge1, edge2);
        assert_eq!(g.edges.len(), 1);
        assert_eq!(g.edges[edge1.index()].weight, 5);
    }

    #[test]
    fn add_duplicate_edges_accumulates() {
        let mut g = Graph::new();
        let a = g.add_node(a());
        let b = g.add_node(b());

        let edge1 = g.merge_edge(Edge::new(a, b, 2), MergePolicy::Accumulate);
        g.merge_edge(Edge::new(b, a, 5), MergePolicy::Accumulate);

        assert_eq!(g.edges.len(), 1);
        assert_eq!(g.edges[edge1.index()].weight, 7);
    }

    #[test]
    fn edges_are_undirected() {
        let mut g = Graph::new();
        let a = g.add_node(a());
        let b = g.add_node(b());
        let c = g.add_node(c());

        g.add_edge(Edge::new(a, b, 2));
        g.add_edge(Edge::new(c, b, 1));

        assert_eq!(g.find_edge(b, a), g.find_edge(a, b));
        assert!(g.find_edge(a, c).is_none());

        let neighbors: Vec<(NodeIndex, Weight)> = g
            .neighbors(b)
            .map(|(_, edge)| (edge.target, edge.weight))
            .collect();
        assert_eq!(neighbors, vec![(a, 2), (c, 1)]);
        assert!(g.neighbors(b).all(|(_, edge)| edge.source == b));
        assert_eq!(g.degree(b), 2);
    }

    #[test]
    #[should_panic]
    fn edge_to_missing_node_panics() {
        let mut g = Graph::new();
        let a = g.add_node(a());
        g.add_edge(Edge::new(a, node_index(3), 1));
    }

    #[test]
    fn export_csv_works() {
        let mut g = Graph::new();
        let a = g.add_node(a());
        let b = g.add_node(b());
        g.add_edge(Edge::new(a, b, 2));

        let dir = std::env::temp_dir().join("safe_route_export_csv_works");
        std::fs::create_dir_all(&dir).unwrap();
        g.export_csv(&dir).unwrap();

        let nodes = std::fs::read_to_string(dir.join("nodes.csv")).unwrap();
        assert_eq!(nodes, "lat,lon,incidents\n-27.48,-58.83,0\n-27.49,-58.84,0\n");

        let edges = std::fs::read_to_string(dir.join("edges.csv")).unwrap();
        assert_eq!(
            edges,
            "source_lat,source_lon,target_lat,target_lon,weight\n-27.48,-58.83,-27.49,-58.84,2\n"
        );
    }
}
