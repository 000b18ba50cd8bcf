use serde::Serialize;

use crate::model::{Competitor, LapMetric, RaceLap};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompetitorStats {
    /// None when no lap had a recorded time. Only the renderer turns this into 0.
    pub fastest_lap: Option<f64>,
    /// Mean of clean laps, 0 when there are none.
    pub average_clean_pace: f64,
    /// Median of clean laps, 0 when there are none.
    pub median_clean_pace: f64,
    pub pitstop_count: u32,
    pub compound_sequence: Vec<String>,
    pub clean_lap_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub competitor_a: CompetitorStats,
    pub competitor_b: CompetitorStats,
    /// Mean of (A - B) over laps where both are green flag with a time.
    pub average_pace_delta: Option<f64>,
    pub delta_lap_count: usize,
}

impl StatsSummary {
    /// One forward pass over the laps in file order. The order matters for
    /// compound collapsing, so callers must not sort the laps first.
    pub fn compute(laps: &[RaceLap]) -> Self {
        let mut acc_a = CompetitorAccumulator::default();
        let mut acc_b = CompetitorAccumulator::default();
        let mut deltas = Vec::new();

        // both cars are accumulated side by side in a single pass
        for lap in laps {
            acc_a.observe(&lap.competitor_a);
            acc_b.observe(&lap.competitor_b);
            if let Some(delta) = green_flag_delta(lap) {
                deltas.push(delta);
            }
        }

        // no shared green-flag laps means no delta at all, not a delta of 0
        let average_pace_delta = if deltas.is_empty() {
            None
        } else {
            Some(mean(&deltas))
        };

        StatsSummary {
            competitor_a: acc_a.finish(),
            competitor_b: acc_b.finish(),
            average_pace_delta,
            delta_lap_count: deltas.len(),
        }
    }

    pub fn competitor(&self, who: Competitor) -> &CompetitorStats {
        match who {
            Competitor::A => &self.competitor_a,
            Competitor::B => &self.competitor_b,
        }
    }

    /// Negative mean delta means A was faster. A delta of exactly 0 goes to B.
    pub fn faster_on_average(&self) -> Option<Competitor> {
        self.average_pace_delta
            .map(|d| if d < 0.0 { Competitor::A } else { Competitor::B })
    }
}

#[derive(Debug, Default)]
struct CompetitorAccumulator {
    pitstops: u32,
    compounds: Vec<String>,
    fastest: Option<f64>,
    clean_laps: Vec<f64>,
}

impl CompetitorAccumulator {
    fn observe(&mut self, metric: &LapMetric) {
        // pitstops count even on laps without a time
        if metric.pitstop {
            self.pitstops += 1;
        }

        // only start a new entry when the compound changes, SOFT-SOFT-MEDIUM gives SOFT, MEDIUM
        let tyre = &metric.tyre_compound;
        if !tyre.is_empty() && self.compounds.last() != Some(tyre) {
            self.compounds.push(tyre.clone());
        }

        // fastest lap looks at every timed lap, the clean sample only at green laps off the pit lane
        if let Some(time) = metric.time {
            self.fastest = Some(self.fastest.map_or(time, |f| f.min(time)));
            if metric.is_clean() {
                self.clean_laps.push(time);
            }
        }
    }

    // mean first, the median sorts the sample in place
    fn finish(mut self) -> CompetitorStats {
        CompetitorStats {
            fastest_lap: self.fastest,
            average_clean_pace: mean(&self.clean_laps),
            median_clean_pace: median(&mut self.clean_laps),
            pitstop_count: self.pitstops,
            compound_sequence: self.compounds,
            clean_lap_count: self.clean_laps.len(),
        }
    }
}

fn green_flag_delta(lap: &RaceLap) -> Option<f64> {
    let (a, b) = (&lap.competitor_a, &lap.competitor_b);
    if a.is_green_flag() && b.is_green_flag() {
        Some(a.time? - b.time?)
    } else {
        None
    }
}

/// A minus B for any lap where both cars have a time, whatever the track status.
pub fn lap_delta(lap: &RaceLap) -> Option<f64> {
    Some(lap.competitor_a.time? - lap.competitor_b.time?)
}

/// Arithmetic mean, 0 for an empty sample.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sorts in place and returns the median, 0 for an empty sample.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);

    // even sample: average the two middle values
    let count = values.len();
    if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    }
}
