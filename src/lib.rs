//! Head-to-head lap time analysis for two cars from a race telemetry export.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod stats;

pub use app::run;
pub use data::{load_race, parse_race_laps};
pub use error::RaceDataError;
pub use model::{Competitor, LapMetric, RaceLap};
pub use stats::{CompetitorStats, StatsSummary};
