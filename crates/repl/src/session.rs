use incident_reader::{Coordinate, IncidentRecord, RecordFilter, Summary};
use log::info;
use safe_route::{
    prelude::*,
    statistics::{average_degree, num_components},
};

/// State of one interactive session. The records are loaded once, the graph
/// is rebuilt from them whenever filter or parameters change.
pub struct Session {
    records: Vec<IncidentRecord>,
    pub filter: RecordFilter,
    pub params: AggregationParams,
    pub snap_decimals: Option<u32>,
    graph: Graph,
    pub last_route: Option<RoutePath>,
}

impl Session {
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        let mut session = Session {
            records,
            filter: RecordFilter::default(),
            params: AggregationParams::default(),
            snap_decimals: None,
            graph: Graph::new(),
            last_route: None,
        };
        session.rebuild();
        session
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Records selected by the current filter and snapping
    pub fn selected_records(&self) -> Vec<IncidentRecord> {
        let selected = self.filter.apply(&self.records);
        match self.snap_decimals {
            Some(decimals) => snap_coordinates(&selected, decimals),
            None => selected,
        }
    }

    pub fn rebuild(&mut self) {
        let records = self.selected_records();
        let mut aggregator = IncidentAggregator::new(self.params);
        self.graph = aggregator.build(&records);
        self.last_route = None;
        info!(
            "Rebuilt graph from {} of {} records",
            records.len(),
            self.records.len()
        );
    }

    pub fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
        self.rebuild();
    }

    pub fn set_params(&mut self, params: AggregationParams) {
        self.params = params;
        self.rebuild();
    }

    pub fn set_snap(&mut self, decimals: Option<u32>) {
        self.snap_decimals = decimals;
        self.rebuild();
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(&self.selected_records())
    }

    pub fn route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutePath, RouteError> {
        let path = SafetyRouter::new(&self.graph).route(origin, destination)?;
        self.last_route = Some(path.clone());
        Ok(path)
    }

    /// The `n` locations with the most incidents, most affected first
    pub fn hotspots(&self, n: usize) -> Vec<(Coordinate, u32)> {
        let mut points: Vec<(Coordinate, u32)> = self.graph.heat_points().collect();
        // Stable sort keeps first-seen order among equal counts
        points.sort_by(|a, b| b.1.cmp(&a.1));
        points.truncate(n);
        points
    }

    pub fn info(&self) -> String {
        format!(
            "{}, #Components: {}, avg. degree: {:.2}\nMerge policy: {}, severity: {}, snapping: {}\nFilter: {:?}",
            self.graph,
            num_components(&self.graph),
            average_degree(&self.graph),
            self.params.get_merge_policy(),
            self.params.get_severity(),
            self.snap_decimals
                .map_or("off".to_string(), |d| format!("{} decimals", d)),
            self.filter
        )
    }
}
