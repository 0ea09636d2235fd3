use rustc_hash::FxHashMap;

use crate::{
    constants::Weight,
    graph::NodeIndex,
};

use self::shortest_path::ShortestPath;

pub mod dijkstra;
pub mod shortest_path;

/// Follows the predecessor links stored in `node_data` from `target` back to `source`.
pub fn reconstruct_path(
    target: NodeIndex,
    source: NodeIndex,
    node_data: &FxHashMap<NodeIndex, (Weight, Option<NodeIndex>)>,
) -> Option<ShortestPath> {
    let mut path = vec![target];
    let weight = node_data.get(&target)?.0;

    if target == source {
        return Some(ShortestPath::new(path, weight));
    }

    let mut previous_node = node_data.get(&target)?.1?;

    while let Some(prev_node) = node_data.get(&previous_node)?.1 {
        path.push(previous_node);
        previous_node = prev_node;
    }
    path.push(source);
    path.reverse();
    Some(ShortestPath::new(path, weight))
}

#[cfg(test)]
pub(crate) fn assert_path(
    expected_path: Vec<usize>,
    expected_weight: Weight,
    path: Option<ShortestPath>,
) {
    let expected_path = expected_path
        .into_iter()
        .map(crate::graph::node_index)
        .collect();
    assert_eq!(
        Some(ShortestPath::new(expected_path, expected_weight)),
        path
    );
}

#[cfg(test)]
pub(crate) fn assert_no_path(path: Option<ShortestPath>) {
    assert_eq!(None, path);
}
