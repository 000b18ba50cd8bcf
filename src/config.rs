use clap::Parser;
use std::path::PathBuf;

use crate::report::Labels;

#[derive(Parser, Debug)]
#[command(
    name = "lapdelta",
    version,
    about = "Compare two drivers' lap times from a race telemetry CSV"
)]
pub struct Cli {
    /// Telemetry export to analyse
    #[arg(default_value = "race.csv")]
    pub input: PathBuf,

    /// Name of the driver in the first column group
    #[arg(long, default_value = "GASLY")]
    pub driver_a: String,

    /// Name of the driver in the second column group
    #[arg(long, default_value = "COLAPINTO")]
    pub driver_b: String,

    /// Event shown next to the lap count
    #[arg(long, default_value = "Sao Paulo Grand Prix 2025, Brazil")]
    pub event: String,

    /// Print the report without terminal colours
    #[arg(long)]
    pub no_color: bool,

    /// Write the parsed laps and the summary as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn labels(&self) -> Labels {
        Labels {
            driver_a: self.driver_a.clone(),
            driver_b: self.driver_b.clone(),
        }
    }
}
