//! Reads road-incident ("siniestros") datasets into typed records.
//!
//! The dataset is a CSV export with one row per incident. Columns are looked
//! up by name once, when the header is read, and every row is converted into
//! an [`IncidentRecord`]. A missing required column or a malformed value
//! aborts the load with a [`DatasetError`] naming the offending row and
//! column.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let records = incident_reader::load_csv(Path::new("siniestros.csv")).unwrap();
//! let summary = incident_reader::Summary::from_records(&records);
//! println!("{}", summary);
//! ```
use log::{debug, info};
use serde::Serialize;
use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

mod coordinate;
mod filter;
mod road_types;
mod summary;

pub use coordinate::{Coordinate, MAX_DECIMALS};
pub use filter::RecordFilter;
pub use road_types::RoadType;
pub use summary::Summary;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not open dataset {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv input")]
    Csv(#[from] csv::Error),
    #[error("required column '{column}' is missing (found columns: {found})")]
    MissingColumn { column: &'static str, found: String },
    #[error("row {row}, column '{column}': {reason} (value: '{value}')")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}

/// Whether a traffic light was present at the incident location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SignalState {
    Present,
    Absent,
    #[default]
    Unknown,
}

impl FromStr for SignalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "si" | "sí" | "yes" | "true" | "1" => Ok(SignalState::Present),
            "no" | "false" | "0" => Ok(SignalState::Absent),
            "" | "sd" | "s/d" | "desconocido" | "unknown" => Ok(SignalState::Unknown),
            _ => Err(format!("Failed to parse signal state '{}'", s)),
        }
    }
}

/// Which count of a record is used as its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityMetric {
    /// Persons injured (`heridos`)
    #[default]
    Injured,
    /// Persons killed (`fallecidos`)
    Fatalities,
    /// Injured and killed persons
    Casualties,
}

impl FromStr for SeverityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "injured" | "heridos" => Ok(SeverityMetric::Injured),
            "fatalities" | "fallecidos" => Ok(SeverityMetric::Fatalities),
            "casualties" | "victimas" | "víctimas" => Ok(SeverityMetric::Casualties),
            _ => Err(format!("Unknown severity metric '{}'", s)),
        }
    }
}

impl fmt::Display for SeverityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityMetric::Injured => f.write_str("injured"),
            SeverityMetric::Fatalities => f.write_str("fatalities"),
            SeverityMetric::Casualties => f.write_str("casualties"),
        }
    }
}

/// One row of the incident dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IncidentRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub injured: u32,
    pub fatalities: u32,
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub road_type: Option<RoadType>,
    pub signal: SignalState,
}

impl IncidentRecord {
    pub fn new(latitude: f64, longitude: f64, injured: u32) -> Self {
        IncidentRecord {
            latitude: Some(latitude),
            longitude: Some(longitude),
            injured,
            ..Default::default()
        }
    }

    /// Returns the location of the incident if both values are present and finite.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let coordinate = Coordinate::new(self.latitude?, self.longitude?);
        coordinate.is_finite().then_some(coordinate)
    }

    pub fn severity_count(&self, metric: SeverityMetric) -> u32 {
        match metric {
            SeverityMetric::Injured => self.injured,
            SeverityMetric::Fatalities => self.fatalities,
            SeverityMetric::Casualties => self.injured.saturating_add(self.fatalities),
        }
    }
}

// Accepted header names per column, first entry is used in error messages
const LATITUDE: &[&str] = &["latitud", "latitude", "lat"];
const LONGITUDE: &[&str] = &["longitud", "longitude", "lon", "lng"];
const INJURED: &[&str] = &["heridos", "injured"];
const FATALITIES: &[&str] = &["fallecidos", "fatalities"];
const YEAR: &[&str] = &["anio", "año", "year"];
const MONTH: &[&str] = &["mes", "month"];
const DAY: &[&str] = &["dia", "día", "day"];
const HOUR: &[&str] = &["hora", "hour"];
const ROAD_TYPE: &[&str] = &["tipo_calle", "road_type"];
const SIGNAL: &[&str] = &["semaforo", "semáforo", "signal"];

/// Column positions resolved from the header row
#[derive(Debug)]
struct Schema {
    latitude: usize,
    longitude: usize,
    injured: usize,
    fatalities: Option<usize>,
    year: Option<usize>,
    month: Option<usize>,
    day: Option<usize>,
    hour: Option<usize>,
    road_type: Option<usize>,
    signal: Option<usize>,
}

impl Schema {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        let find = |aliases: &[&str]| position(&names, aliases);
        let require = |aliases: &[&'static str]| {
            position(&names, aliases).ok_or_else(|| DatasetError::MissingColumn {
                column: aliases[0],
                found: names.join(", "),
            })
        };

        Ok(Schema {
            latitude: require(LATITUDE)?,
            longitude: require(LONGITUDE)?,
            injured: require(INJURED)?,
            fatalities: find(FATALITIES),
            year: find(YEAR),
            month: find(MONTH),
            day: find(DAY),
            hour: find(HOUR),
            road_type: find(ROAD_TYPE),
            signal: find(SIGNAL),
        })
    }

    fn parse_record(
        &self,
        row: usize,
        record: &csv::StringRecord,
    ) -> Result<IncidentRecord, DatasetError> {
        let field = |idx: usize| record.get(idx).unwrap_or("");
        let optional = |idx: Option<usize>| idx.map(field).unwrap_or("");
        let invalid = |column: &'static str, value: &str, reason: String| {
            DatasetError::InvalidField {
                row,
                column,
                value: value.to_string(),
                reason,
            }
        };

        let latitude = parse_float(field(self.latitude))
            .map_err(|e| invalid(LATITUDE[0], field(self.latitude), e))?;
        let longitude = parse_float(field(self.longitude))
            .map_err(|e| invalid(LONGITUDE[0], field(self.longitude), e))?;
        let injured = parse_count(field(self.injured))
            .map_err(|e| invalid(INJURED[0], field(self.injured), e))?;
        let fatalities = parse_count(optional(self.fatalities))
            .map_err(|e| invalid(FATALITIES[0], optional(self.fatalities), e))?;
        let year = parse_bounded::<i32>(optional(self.year), i32::MIN, i32::MAX)
            .map_err(|e| invalid(YEAR[0], optional(self.year), e))?;
        let month = parse_bounded::<u8>(optional(self.month), 1, 12)
            .map_err(|e| invalid(MONTH[0], optional(self.month), e))?;
        let day = parse_bounded::<u8>(optional(self.day), 1, 31)
            .map_err(|e| invalid(DAY[0], optional(self.day), e))?;
        let hour = parse_bounded::<u8>(optional(self.hour), 0, 23)
            .map_err(|e| invalid(HOUR[0], optional(self.hour), e))?;

        let road_type = match optional(self.road_type) {
            "" => None,
            raw => Some(
                raw.parse::<RoadType>()
                    .map_err(|e| invalid(ROAD_TYPE[0], raw, e))?,
            ),
        };
        let signal = optional(self.signal)
            .parse::<SignalState>()
            .map_err(|e| invalid(SIGNAL[0], optional(self.signal), e))?;

        Ok(IncidentRecord {
            latitude,
            longitude,
            injured,
            fatalities,
            year,
            month,
            day,
            hour,
            road_type,
            signal,
        })
    }
}

fn position(names: &[String], aliases: &[&str]) -> Option<usize> {
    names
        .iter()
        .position(|name| aliases.iter().any(|alias| name.as_str() == *alias))
}

// Empty cells are missing values, anything else must be numeric
fn parse_float(raw: &str) -> Result<Option<f64>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| "not a number".to_string())
}

// Counts exported from dataframes may carry a trailing ".0"
fn parse_count(raw: &str) -> Result<u32, String> {
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(count) = raw.parse::<u32>() {
        return Ok(count);
    }
    match raw.parse::<f64>() {
        Ok(value) if value < 0.0 => Err("negative count".to_string()),
        Ok(value) if value.fract() == 0.0 && value <= u32::MAX as f64 => Ok(value as u32),
        _ => Err("not a non-negative integer".to_string()),
    }
}

fn parse_bounded<T>(raw: &str, min: T, max: T) -> Result<Option<T>, String>
where
    T: FromStr + PartialOrd + fmt::Display + Copy + Into<f64>,
{
    if raw.is_empty() {
        return Ok(None);
    }
    let out_of_range = || format!("out of range [{}, {}]", min, max);
    let value = match raw.parse::<T>() {
        Ok(value) => value,
        // Allow "3.0" style integers, and integers beyond the range of `T`
        Err(_) => match raw.parse::<f64>() {
            Ok(float) if float.fract() == 0.0 => {
                if float < min.into() || float > max.into() {
                    return Err(out_of_range());
                }
                format!("{}", float as i64)
                    .parse::<T>()
                    .map_err(|_| "not an integer".to_string())?
            }
            _ => return Err("not an integer".to_string()),
        },
    };
    if value < min || value > max {
        return Err(out_of_range());
    }
    Ok(Some(value))
}

/// Reads all incident records from `rdr`, keeping the row order of the input.
pub fn read_csv<R: Read>(rdr: R) -> Result<Vec<IncidentRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let schema = Schema::from_headers(reader.headers()?)?;
    debug!("Resolved dataset schema: {:?}", schema);

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        records.push(schema.parse_record(i + 1, &record)?);
    }

    Ok(records)
}

/// Loads the dataset at `path` into memory.
pub fn load_csv(path: &Path) -> Result<Vec<IncidentRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let now = std::time::Instant::now();
    info!("BEGIN reading {}", path.display());
    let records = read_csv(BufReader::new(file))?;
    info!(
        "FINISHED reading {} records. Took {:?}",
        records.len(),
        now.elapsed()
    );

    Ok(records)
}
