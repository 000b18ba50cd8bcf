use serde::Serialize;

/// Track status code for normal racing.
pub const GREEN_FLAG: i32 = 1;

/// Which of the two cars a metric or a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Competitor {
    A,
    B,
}

// one car's data for one lap. None means the CSV cell was blank, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LapMetric {
    pub time: Option<f64>,
    pub position: Option<u32>,
    pub tyre_compound: String,
    pub pitstop: bool,
    pub status: Option<i32>,
}

impl LapMetric {
    pub fn is_green_flag(&self) -> bool {
        self.status == Some(GREEN_FLAG)
    }

    /// Green flag, no pitstop and a recorded time.
    pub fn is_clean(&self) -> bool {
        self.is_green_flag() && !self.pitstop && self.time.is_some()
    }

    pub fn track_status(&self) -> TrackStatus {
        TrackStatus::from_code(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceLap {
    pub lap_number: u32,
    pub competitor_a: LapMetric,
    pub competitor_b: LapMetric,
}

impl RaceLap {
    pub fn metric(&self, who: Competitor) -> &LapMetric {
        match who {
            Competitor::A => &self.competitor_a,
            Competitor::B => &self.competitor_b,
        }
    }
}

// status codes as documented in the telemetry export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    Green,
    Yellow,
    SafetyCar,
    Red,
    VirtualSafetyCar,
    VscEnding,
    Unlabeled,
}

impl TrackStatus {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(1) => TrackStatus::Green,
            Some(2) => TrackStatus::Yellow,
            Some(4) => TrackStatus::SafetyCar,
            Some(5) => TrackStatus::Red,
            Some(6) => TrackStatus::VirtualSafetyCar,
            Some(7) => TrackStatus::VscEnding,
            _ => TrackStatus::Unlabeled,
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            TrackStatus::Green => "Green",
            TrackStatus::Yellow => "Yellow",
            TrackStatus::SafetyCar => "SC",
            TrackStatus::Red => "Red",
            TrackStatus::VirtualSafetyCar => "VSC",
            TrackStatus::VscEnding => "VSC end",
            TrackStatus::Unlabeled => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Other,
}

impl TyreCompound {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "SOFT" => TyreCompound::Soft,
            "MEDIUM" => TyreCompound::Medium,
            "HARD" => TyreCompound::Hard,
            _ => TyreCompound::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(time: Option<f64>, status: Option<i32>, pitstop: bool) -> LapMetric {
        LapMetric {
            time,
            status,
            pitstop,
            ..Default::default()
        }
    }

    #[test]
    fn clean_lap_needs_green_time_and_no_pitstop() {
        assert!(metric(Some(90.1), Some(1), false).is_clean());
        assert!(!metric(Some(90.1), Some(1), true).is_clean());
        assert!(!metric(Some(90.1), Some(2), false).is_clean());
        assert!(!metric(None, Some(1), false).is_clean());
        assert!(!metric(Some(90.1), None, false).is_clean());
    }

    #[test]
    fn unknown_status_codes_are_unlabeled() {
        assert_eq!(TrackStatus::from_code(Some(3)), TrackStatus::Unlabeled);
        assert_eq!(TrackStatus::from_code(None).short_label(), "");
        assert_eq!(TrackStatus::from_code(Some(7)).short_label(), "VSC end");
        assert_eq!(TrackStatus::from_code(Some(4)).short_label(), "SC");
    }

    #[test]
    fn compound_classification_ignores_case_and_padding() {
        assert_eq!(TyreCompound::classify(" soft "), TyreCompound::Soft);
        assert_eq!(TyreCompound::classify("MEDIUM"), TyreCompound::Medium);
        assert_eq!(TyreCompound::classify("Hard"), TyreCompound::Hard);
        assert_eq!(TyreCompound::classify("INTERMEDIATE"), TyreCompound::Other);
    }
}
