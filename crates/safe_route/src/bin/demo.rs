use anyhow::Context;
use incident_reader::{load_csv, Summary};
use safe_route::{prelude::*, statistics::num_components, util::cli};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = cli::parse()?;

    // Load the dataset once and narrow it down
    let records = load_csv(&cfg.dataset)
        .with_context(|| format!("Failed to load {}", cfg.dataset.display()))?;
    let mut records = if cfg.filter.is_empty() {
        records
    } else {
        cfg.filter.apply(&records)
    };
    if let Some(decimals) = cfg.snap_decimals {
        records = snap_coordinates(&records, decimals);
    }
    println!("{}", Summary::from_records(&records));

    // Build the incident graph
    let mut aggregator = IncidentAggregator::new(cfg.params);
    let g = aggregator.build(&records);
    println!("{}, #Components: {}", g, num_components(&g));

    if let Some(dir) = &cfg.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        g.export_csv(dir)?;
    }

    // Search
    let mut router = SafetyRouter::new(&g);
    match router.route(cfg.origin, cfg.destination) {
        Ok(path) => {
            println!("{}", path);
            println!("Took: {:?}", router.stats().duration);
            if let Some(dir) = &cfg.export_dir {
                path.write_csv(&dir.join("route.csv"))?;
            }
        }
        Err(e) => println!("{}", e),
    }

    Ok(())
}
