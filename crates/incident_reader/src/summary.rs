use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::IncidentRecord;

/// Descriptive totals over a set of incident records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub incidents: usize,
    pub injured: u64,
    pub fatalities: u64,
    /// Records with a usable coordinate
    pub located: usize,
    pub distinct_locations: usize,
}

impl Summary {
    pub fn from_records(records: &[IncidentRecord]) -> Self {
        let mut summary = Summary {
            incidents: records.len(),
            ..Default::default()
        };
        let mut locations = FxHashSet::default();

        for record in records {
            summary.injured += record.injured as u64;
            summary.fatalities += record.fatalities as u64;
            if let Some(coordinate) = record.coordinate() {
                summary.located += 1;
                locations.insert(coordinate);
            }
        }
        summary.distinct_locations = locations.len();

        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Incidents:\t{}", self.incidents)?;
        writeln!(f, "Injured:\t{}", self.injured)?;
        writeln!(f, "Fatalities:\t{}", self.fatalities)?;
        write!(
            f,
            "Located:\t{} ({} distinct locations)",
            self.located, self.distinct_locations
        )
    }
}
