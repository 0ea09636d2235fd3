use std::path::Path;

use incident_reader::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let now = std::time::Instant::now();
    // Read path to file from command line
    let csv_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("No path to dataset given"))?;

    let records = load_csv(Path::new(&csv_path))?;

    let elapsed = now.elapsed();

    println!(
        "Finished reading dataset in {}.{:03} seconds",
        elapsed.as_secs(),
        elapsed.subsec_millis()
    );
    println!("{}", Summary::from_records(&records));
    Ok(())
}
