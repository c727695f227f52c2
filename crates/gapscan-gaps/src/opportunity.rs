//! Business-value score for an uncovered topic.
//!
//! `0.7 * position_score + 0.3 * impression_score`. The position term is a
//! logistic curve centred on position 10; the impression term is
//! `log10(impressions + 1) / 10`. Neither term nor the total is clamped, so
//! very large impression counts can push the score past 1.0.

use serde::{Deserialize, Serialize};

pub const POSITION_WEIGHT: f64 = 0.7;
pub const IMPRESSION_WEIGHT: f64 = 0.3;
pub const POSITION_MIDPOINT: f64 = 10.0;
pub const POSITION_STEEPNESS: f64 = 0.5;

pub fn position_score(position: f64) -> f64 {
    1.0 / (1.0 + (POSITION_STEEPNESS * (position - POSITION_MIDPOINT)).exp())
}

#[allow(clippy::cast_precision_loss)]
pub fn impression_score(impressions: u64) -> f64 {
    (impressions as f64 + 1.0).log10() / 10.0
}

pub fn opportunity_score(position: f64, impressions: u64) -> f64 {
    POSITION_WEIGHT * position_score(position) + IMPRESSION_WEIGHT * impression_score(impressions)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub position_score: f64,
    pub impression_score: f64,
    pub opportunity_score: f64,
}

impl ScoreBreakdown {
    pub fn new(position: f64, impressions: u64) -> Self {
        Self {
            position_score: position_score(position),
            impression_score: impression_score(impressions),
            opportunity_score: opportunity_score(position, impressions),
        }
    }
}
