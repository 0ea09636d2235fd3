//! Interactive session to explore safe routes of an incident dataset
use std::path::{Path, PathBuf};

use incident_reader::{load_csv, Coordinate, RecordFilter, RoadType, SeverityMetric, SignalState};
use indicatif::ProgressBar;
use reedline_repl_rs::clap::{value_parser, Arg, ArgMatches, Command};
use reedline_repl_rs::{Repl, Result};
use safe_route::prelude::*;

mod session;
use session::Session;

/// Print graph info
fn info(_args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    Ok(Some(context.info()))
}

fn summary(_args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    Ok(Some(context.summary().to_string()))
}

fn set_filter(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    let mut filter = RecordFilter::new();

    if let Some(year) = args.get_one::<i32>("year") {
        filter = filter.year(*year);
    }
    if let Some(month) = args.get_one::<u8>("month") {
        filter = filter.month(*month);
    }
    if let Some(hours) = args.get_one::<String>("hours") {
        match safe_route::util::cli::parse_hour_range(hours) {
            Ok((from, to)) => filter = filter.hour_range(from, to),
            Err(e) => return Ok(Some(e)),
        }
    }
    if let Some(road_type) = args.get_one::<String>("road_type") {
        match road_type.parse::<RoadType>() {
            Ok(road_type) => filter = filter.road_type(road_type),
            Err(e) => return Ok(Some(e)),
        }
    }
    if let Some(signal) = args.get_one::<String>("signal") {
        match signal.parse::<SignalState>() {
            Ok(signal) => filter = filter.signal(signal),
            Err(e) => return Ok(Some(e)),
        }
    }

    context.set_filter(filter);
    Ok(Some(context.info()))
}

fn reset(_args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    context.set_filter(RecordFilter::default());
    Ok(Some(context.info()))
}

fn set_policy(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    let policy = args.get_one::<String>("policy").map(String::as_str).unwrap_or("");
    match policy.parse::<MergePolicy>() {
        Ok(policy) => {
            context.set_params(context.params.merge_policy(policy));
            Ok(Some(context.info()))
        }
        Err(e) => Ok(Some(e)),
    }
}

fn set_metric(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    let metric = args.get_one::<String>("metric").map(String::as_str).unwrap_or("");
    match metric.parse::<SeverityMetric>() {
        Ok(metric) => {
            context.set_params(context.params.severity(metric));
            Ok(Some(context.info()))
        }
        Err(e) => Ok(Some(e)),
    }
}

fn set_snap(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    context.set_snap(args.get_one::<u32>("decimals").copied());
    Ok(Some(context.info()))
}

fn run_route(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    let coord = |lat: &str, lon: &str| {
        Coordinate::new(
            *args.get_one::<f64>(lat).unwrap_or(&f64::NAN),
            *args.get_one::<f64>(lon).unwrap_or(&f64::NAN),
        )
    };
    let origin = coord("src_lat", "src_lon");
    let destination = coord("dst_lat", "dst_lon");

    match context.route(origin, destination) {
        Ok(path) => Ok(Some(path.to_string())),
        Err(e) => Ok(Some(e.to_string())),
    }
}

fn heat(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    let n = *args.get_one::<usize>("n").unwrap_or(&10);

    let mut res = String::new();
    for (coordinate, incidents) in context.hotspots(n) {
        res.push_str(&format!("{}: {}\n", coordinate, incidents));
    }
    Ok(Some(res))
}

fn export(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    let dir = args
        .get_one::<String>("dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let result = std::fs::create_dir_all(&dir)
        .map_err(anyhow::Error::from)
        .and_then(|_| context.graph().export_csv(&dir))
        .and_then(|_| match &context.last_route {
            Some(path) => path.write_csv(&dir.join("route.csv")),
            None => Ok(()),
        });

    match result {
        Ok(()) => Ok(Some(format!("Exported to {}", dir.display()))),
        Err(e) => Ok(Some(format!("Export failed: {:#}", e))),
    }
}

fn measure_routes(args: ArgMatches, context: &mut Session) -> Result<Option<String>> {
    use rand::Rng;

    let n = *args.get_one::<usize>("n").unwrap_or(&10);
    let g = context.graph();
    if g.num_nodes() == 0 {
        return Ok(Some("Graph is empty".to_string()));
    }

    // Select n random start and end locations
    let mut rng = rand::thread_rng();
    let pairs: Vec<(Coordinate, Coordinate)> = (0..n)
        .map(|_| {
            (
                g.nodes[rng.gen_range(0..g.nodes.len())].coordinate,
                g.nodes[rng.gen_range(0..g.nodes.len())].coordinate,
            )
        })
        .collect();

    let mut router = SafetyRouter::new(g);
    let mut found = 0;
    let mut res = String::new();
    let pb = ProgressBar::new(n as u64);
    for (src, dst) in pairs {
        if router.route(src, dst).is_ok() {
            found += 1;
            res.push_str(&format!(
                "{} -> {}: {:?}\n",
                src,
                dst,
                router.stats().duration
            ));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    res.push_str(&format!("{} of {} routes found", found, n));

    Ok(Some(res))
}

fn coordinate_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .required(true)
        .help(help)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Load the dataset once for the whole session
    let path_to_csv = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("No path to dataset given"))?;
    let records = load_csv(Path::new(&path_to_csv))?;
    let context = Session::new(records);

    let mut repl = Repl::new(context)
        .with_name("Siniestros")
        .with_version("v0.1.0")
        .with_description("Find the safest route between recorded incident locations")
        .with_banner("Welcome to Siniestros")
        .with_history(PathBuf::from("history"), 100)
        .with_command(Command::new("info").about("Print graph info"), info)
        .with_command(
            Command::new("summary").about("Print incident totals of the current selection"),
            summary,
        )
        .with_command(
            Command::new("filter")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32))
                        .help("Only incidents of this year"),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_parser(value_parser!(u8))
                        .help("Only incidents of this month"),
                )
                .arg(
                    Arg::new("hours")
                        .long("hours")
                        .help("Only incidents within this hour window, e.g. 22-3"),
                )
                .arg(
                    Arg::new("road_type")
                        .long("road-type")
                        .help("Only incidents on this road type"),
                )
                .arg(
                    Arg::new("signal")
                        .long("signal")
                        .help("Only incidents with (si) or without (no) traffic light"),
                )
                .about("Select incidents and rebuild the graph"),
            set_filter,
        )
        .with_command(
            Command::new("reset").about("Remove all filters and rebuild the graph"),
            reset,
        )
        .with_command(
            Command::new("policy")
                .arg(
                    Arg::new("policy")
                        .required(true)
                        .help("overwrite or accumulate"),
                )
                .about("Set how repeated location pairs are weighted"),
            set_policy,
        )
        .with_command(
            Command::new("metric")
                .arg(
                    Arg::new("metric")
                        .required(true)
                        .help("injured, fatalities or casualties"),
                )
                .about("Set the count used as severity"),
            set_metric,
        )
        .with_command(
            Command::new("snap")
                .arg(
                    Arg::new("decimals")
                        .value_parser(value_parser!(u32))
                        .required(false)
                        .help("Number of decimals (at most 15), no value disables snapping"),
                )
                .about("Round coordinates before building the graph"),
            set_snap,
        )
        .with_command(
            Command::new("route")
                .arg(coordinate_arg("src_lat", "Latitude of the origin"))
                .arg(coordinate_arg("src_lon", "Longitude of the origin"))
                .arg(coordinate_arg("dst_lat", "Latitude of the destination"))
                .arg(coordinate_arg("dst_lon", "Longitude of the destination"))
                .about("Calculate the safest route between two incident locations"),
            run_route,
        )
        .with_command(
            Command::new("heat")
                .arg(
                    Arg::new("n")
                        .value_parser(value_parser!(usize))
                        .required(false)
                        .help("Number of locations to list"),
                )
                .about("List the locations with the most incidents"),
            heat,
        )
        .with_command(
            Command::new("export")
                .arg(
                    Arg::new("dir")
                        .required(false)
                        .help("Target directory"),
                )
                .about("Write nodes.csv, edges.csv and the last route"),
            export,
        )
        .with_command(
            Command::new("bench")
                .arg(
                    Arg::new("n")
                        .value_parser(value_parser!(usize))
                        .required(false)
                        .help("Number of random routes to calculate"),
                )
                .about("Measure `n` random route calculations"),
            measure_routes,
        );

    repl.run()?;
    Ok(())
}
