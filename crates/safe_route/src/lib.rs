//! Crate to find the safest route through recorded road incidents.
//!
//! # Basic usage
//! ```no_run
//! use incident_reader::{load_csv, Coordinate};
//! use safe_route::prelude::*;
//! use std::path::Path;
//!
//! // Load the incident dataset once
//! let records = load_csv(Path::new("path/to/siniestros.csv")).expect("Failed to load dataset");
//!
//! // Build the incident graph with the default parameters
//! let mut aggregator = IncidentAggregator::new(AggregationParams::default());
//! let g = aggregator.build(&records);
//!
//! // Query the route of least cumulative severity
//! let mut router = SafetyRouter::new(&g);
//! let path = router
//!     .route(Coordinate::new(-27.48, -58.83), Coordinate::new(-27.50, -58.85))
//!     .expect("Failed to find route");
//! println!("Severity: {}", path.weight);
//!```
//! [`Graph`]: crate::graph::Graph
pub mod aggregation_params;
pub mod aggregator;
pub mod constants;
pub mod graph;
pub mod prelude;
pub mod router;
pub mod search;
pub mod statistics;
pub mod util;
