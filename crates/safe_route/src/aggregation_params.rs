//! Parameters for building the incident graph
use std::{fmt, str::FromStr};

use incident_reader::SeverityMetric;

/// What happens when two record pairs connect the same two locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The weight written last replaces the previous one
    #[default]
    Overwrite,
    /// Weights of all record pairs are summed up
    Accumulate,
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" | "last" => Ok(MergePolicy::Overwrite),
            "accumulate" | "sum" => Ok(MergePolicy::Accumulate),
            _ => Err(format!(
                "Unknown merge policy '{}'. Possible values are \"overwrite\" and \"accumulate\"",
                s
            )),
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::Overwrite => f.write_str("overwrite"),
            MergePolicy::Accumulate => f.write_str("accumulate"),
        }
    }
}

/// Parameters for the incident aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationParams {
    pub(crate) merge_policy: MergePolicy,
    pub(crate) severity: SeverityMetric,
}

impl AggregationParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn severity(mut self, metric: SeverityMetric) -> Self {
        self.severity = metric;
        self
    }

    pub fn get_merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    pub fn get_severity(&self) -> SeverityMetric {
        self.severity
    }
}
