//! Score normalization and bands

use serde::{Deserialize, Serialize};

/// Lighthouse-style colour band for a 0..=100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 0..=49
    Fail,
    /// 50..=89
    Average,
    /// 90..=100
    Pass,
}

impl ScoreBand {
    /// Band for an integer score
    pub fn of(score: u8) -> Self {
        match score {
            0..=49 => ScoreBand::Fail,
            50..=89 => ScoreBand::Average,
            _ => ScoreBand::Pass,
        }
    }
}

/// Round to the nearest integer and clamp into 0..=100
///
/// Non-finite input maps to 0.
pub fn normalize_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Convert a Lighthouse 0..=1 fraction into a 0..=100 score
pub fn score_from_fraction(fraction: f64) -> u8 {
    normalize_score(fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(ScoreBand::of(0), ScoreBand::Fail);
        assert_eq!(ScoreBand::of(49), ScoreBand::Fail);
        assert_eq!(ScoreBand::of(50), ScoreBand::Average);
        assert_eq!(ScoreBand::of(89), ScoreBand::Average);
        assert_eq!(ScoreBand::of(90), ScoreBand::Pass);
        assert_eq!(ScoreBand::of(100), ScoreBand::Pass);
    }

    #[test]
    fn test_normalize_rounds_and_clamps() {
        assert_eq!(normalize_score(72.4), 72);
        assert_eq!(normalize_score(72.5), 73);
        assert_eq!(normalize_score(-3.0), 0);
        assert_eq!(normalize_score(140.0), 100);
        assert_eq!(normalize_score(f64::NAN), 0);
    }

    #[test]
    fn test_fraction() {
        assert_eq!(score_from_fraction(0.87), 87);
        assert_eq!(score_from_fraction(1.0), 100);
        assert_eq!(score_from_fraction(0.0), 0);
    }
}
