use std::path::PathBuf;

use clap::Parser;
use incident_reader::{Coordinate, RecordFilter, RoadType, SeverityMetric, SignalState};

use crate::aggregation_params::{AggregationParams, MergePolicy};

#[derive(Parser, Debug)]
#[command(author = "Daniel Holzner", version, about, long_about = None)]
struct Cli {
    /// Path to the incident dataset (.csv)
    dataset: PathBuf,

    /// Start of the route as "lat,lon"
    #[arg(allow_hyphen_values = true, value_parser = parse_coordinate)]
    origin: Coordinate,

    /// End of the route as "lat,lon"
    #[arg(allow_hyphen_values = true, value_parser = parse_coordinate)]
    destination: Coordinate,

    /// How repeated location pairs are weighted. Possible values are "overwrite" and "accumulate"
    #[arg(short, long, value_name = "policy")]
    policy: Option<String>,

    /// Count used as severity. Possible values are "injured", "fatalities" and "casualties"
    #[arg(short, long, value_name = "metric")]
    metric: Option<String>,

    /// Round coordinates to this many decimals before building the graph
    #[arg(long, value_name = "decimals")]
    snap: Option<u32>,

    /// Only use incidents of this year
    #[arg(short, long)]
    year: Option<i32>,

    /// Only use incidents of this month
    #[arg(long)]
    month: Option<u8>,

    /// Only use incidents within this hour window, e.g. "22-3"
    #[arg(long, value_name = "from-to", value_parser = parse_hour_range)]
    hours: Option<(u8, u8)>,

    /// Only use incidents on this road type
    #[arg(long, value_name = "type")]
    road_type: Option<String>,

    /// Only use incidents with ("si") or without ("no") traffic light
    #[arg(long, value_name = "state")]
    signal: Option<String>,

    /// Write nodes.csv, edges.csv and route.csv into this directory
    #[arg(short, long, value_name = "dir")]
    export: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Cfg {
    pub dataset: PathBuf,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub params: AggregationParams,
    pub filter: RecordFilter,
    pub snap_decimals: Option<u32>,
    pub export_dir: Option<PathBuf>,
}

pub fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected \"lat,lon\", got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("Invalid latitude '{}'", lat))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("Invalid longitude '{}'", lon))?;
    Ok(Coordinate::new(lat, lon))
}

pub fn parse_hour_range(s: &str) -> Result<(u8, u8), String> {
    let (from, to) = s
        .split_once('-')
        .ok_or_else(|| format!("Expected \"from-to\", got '{}'", s))?;
    let parse_hour = |hour: &str| {
        hour.trim()
            .parse::<u8>()
            .ok()
            .filter(|hour| *hour < 24)
            .ok_or_else(|| format!("Invalid hour '{}'", hour))
    };
    Ok((parse_hour(from)?, parse_hour(to)?))
}

impl Cli {
    fn into_cfg(self) -> Result<Cfg, String> {
        let mut params = AggregationParams::new();
        if let Some(policy) = self.policy.as_deref() {
            params = params.merge_policy(policy.parse::<MergePolicy>()?);
        }
        if let Some(metric) = self.metric.as_deref() {
            params = params.severity(metric.parse::<SeverityMetric>()?);
        }

        let mut filter = RecordFilter::new();
        if let Some(year) = self.year {
            filter = filter.year(year);
        }
        if let Some(month) = self.month {
            filter = filter.month(month);
        }
        if let Some((from, to)) = self.hours {
            filter = filter.hour_range(from, to);
        }
        if let Some(road_type) = self.road_type.as_deref() {
            filter = filter.road_type(road_type.parse::<RoadType>()?);
        }
        if let Some(signal) = self.signal.as_deref() {
            filter = filter.signal(signal.parse::<SignalState>()?);
        }

        Ok(Cfg {
            dataset: self.dataset,
            origin: self.origin,
            destination: self.destination,
            params,
            filter,
            snap_decimals: self.snap,
            export_dir: self.export,
        })
    }
}

pub fn parse() -> anyhow::Result<Cfg> {
    Cli::parse().into_cfg().map_err(anyhow::Error::msg)
}
