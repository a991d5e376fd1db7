use std::ops::Range;

use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::scaler::StandardScaler;

/// Scores at or above this value pass.
pub const PASS_THRESHOLD: f64 = 60.0;
/// Scores in this half-open band are moved by the pass-rate nudge.
pub const PASS_BAND: Range<f64> = 50.0..70.0;
pub const SCORE_MINIMUM: f64 = 0.0;
pub const SCORE_MAXIMUM: f64 = 100.0;
/// Lower bound for the target standard deviation of the spread step.
pub const MINIMUM_SPREAD: f64 = 0.1;

pub const SHIFT_LIMIT: i32 = 20;
pub const SPREAD_STEPS_LIMIT: i32 = 10;
pub const PASS_RATE_LIMIT: i32 = 30;

/// The three slider positions controlling the transform.
///
/// `spread_steps` is kept as the integer slider position, the actual change of
/// the standard deviation is `spread_steps / 10`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct Adjustment {
    pub shift: i32,
    pub spread_steps: i32,
    pub pass_rate_adjust: i32,
}

impl Adjustment {
    pub fn new(shift: i32, spread_steps: i32, pass_rate_adjust: i32) -> Self {
        Adjustment {
            shift,
            spread_steps,
            pass_rate_adjust,
        }
        .clamped()
    }

    /// Pulls every field back into its slider range.
    pub fn clamped(self) -> Self {
        Adjustment {
            shift: self.shift.clamp(-SHIFT_LIMIT, SHIFT_LIMIT),
            spread_steps: self
                .spread_steps
                .clamp(-SPREAD_STEPS_LIMIT, SPREAD_STEPS_LIMIT),
            pass_rate_adjust: self
                .pass_rate_adjust
                .clamp(-PASS_RATE_LIMIT, PASS_RATE_LIMIT),
        }
    }

    pub fn spread_delta(&self) -> f64 {
        f64::from(self.spread_steps) / 10.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Adjustment::default()
    }

    pub fn apply(&self, original: &[f64]) -> Vec<f64> {
        adjust(
            original,
            self.shift,
            self.spread_delta(),
            self.pass_rate_adjust,
        )
    }
}

/// Maps the original scores to adjusted scores.
///
/// Runs shift, spread rescale, pass band nudge and clamp in that order, every
/// step on the output of the previous one. The input is never touched and
/// every call starts over from it.
pub fn adjust(original: &[f64], shift: i32, spread_delta: f64, pass_rate_adjust: i32) -> Vec<f64> {
    let mut scores = Array1::from(original.to_vec()) + f64::from(shift);

    // a single score has no spread to rescale
    if scores.len() > 1 {
        if spread_delta != 0.0 {
            scores = rescale_spread(scores, spread_delta);
        }
        if pass_rate_adjust != 0 {
            scores = nudge_pass_band(scores, pass_rate_adjust);
        }
    }

    scores.mapv_inplace(|score| score.clamp(SCORE_MINIMUM, SCORE_MAXIMUM));

    debug!(
        "adjusted {} scores (shift {}, spread {:.1}, pass rate {})",
        scores.len(),
        shift,
        spread_delta,
        pass_rate_adjust
    );

    scores.to_vec()
}

fn rescale_spread(scores: Array1<f64>, spread_delta: f64) -> Array1<f64> {
    match StandardScaler::new(scores.view()) {
        Some(scaler) if scaler.standard_deviation > 0.0 => {
            let target_deviation = (scaler.standard_deviation + spread_delta).max(MINIMUM_SPREAD);
            scaler.rescale(scores.view(), target_deviation)
        }
        // identical scores, nothing to rescale
        _ => scores,
    }
}

// every delta is computed from the incoming snapshot, never from already nudged scores
fn nudge_pass_band(scores: Array1<f64>, pass_rate_adjust: i32) -> Array1<f64> {
    let factor = f64::from(pass_rate_adjust) / 10.0;

    scores.mapv(|score| {
        if PASS_BAND.contains(&score) {
            score + band_delta(score, factor) * 5.0
        } else {
            score
        }
    })
}

// strongest right at the pass threshold, fading towards the band edges
fn band_delta(score: f64, factor: f64) -> f64 {
    let distance = PASS_THRESHOLD - score;
    if distance > 0.0 {
        factor * (1.0 - distance / 10.0)
    } else {
        factor * (1.0 - distance.abs() / 10.0)
    }
}
