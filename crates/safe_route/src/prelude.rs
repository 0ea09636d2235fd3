//! Re-exports of the most commonly used items in `safe_route`.
pub use crate::aggregation_params::AggregationParams;
pub use crate::aggregation_params::MergePolicy;
pub use crate::aggregator::snap_coordinates;
pub use crate::aggregator::IncidentAggregator;
pub use crate::router::RouteError;
pub use crate::router::RoutePath;
pub use crate::router::SafetyRouter;

pub use crate::search;

pub use crate::graph::node_index;
pub use crate::graph::Graph;
pub use crate::util::test_graphs::example_graph;
