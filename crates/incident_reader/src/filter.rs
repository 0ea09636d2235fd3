use crate::{IncidentRecord, RoadType, SignalState};

/// Selects a subset of incident records.
///
/// Every criterion that is set must match; an empty filter matches all
/// records. Records lacking the attribute a criterion refers to never match
/// that criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub year: Option<i32>,
    pub month: Option<u8>,
    /// Inclusive hour window, wraps around midnight if `from > to`
    pub hour_range: Option<(u8, u8)>,
    pub road_type: Option<RoadType>,
    pub signal: Option<SignalState>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u8) -> Self {
        self.month = Some(month);
        self
    }

    pub fn hour_range(mut self, from: u8, to: u8) -> Self {
        self.hour_range = Some((from, to));
        self
    }

    pub fn road_type(mut self, road_type: RoadType) -> Self {
        self.road_type = Some(road_type);
        self
    }

    pub fn signal(mut self, signal: SignalState) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == RecordFilter::default()
    }

    pub fn matches(&self, record: &IncidentRecord) -> bool {
        if let Some(year) = self.year {
            if record.year != Some(year) {
                return false;
            }
        }
        if let Some(month) = self.month {
            if record.month != Some(month) {
                return false;
            }
        }
        if let Some((from, to)) = self.hour_range {
            let Some(hour) = record.hour else {
                return false;
            };
            let in_window = if from <= to {
                (from..=to).contains(&hour)
            } else {
                hour >= from || hour <= to
            };
            if !in_window {
                return false;
            }
        }
        if let Some(road_type) = self.road_type {
            if record.road_type != Some(road_type) {
                return false;
            }
        }
        if let Some(signal) = self.signal {
            if record.signal != signal {
                return false;
            }
        }
        true
    }

    /// Returns the matching records in their original order.
    pub fn apply(&self, records: &[IncidentRecord]) -> Vec<IncidentRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
