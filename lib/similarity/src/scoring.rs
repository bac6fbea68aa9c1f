//! Compatibility scorers for DJ transitions
//!
//! Each scorer compares the current track's value (`a`) with a candidate's
//! value (`b`) under a directional intent. All functions return a score in
//! range [0.0, 1.0] where 1.0 means the candidate fits the intent best.

use crate::direction::{Direction, TempoDirection};

/// Default relative tempo tolerance (7%)
pub const DEFAULT_TEMPO_TOLERANCE: f64 = 0.07;

/// Best score a half-time or double-time match can reach
const HALF_DOUBLE_CEILING: f64 = 0.9;

/// Score tempo compatibility
///
/// # Arguments
/// * `bpm_a` - Current track tempo (0 is treated as 1)
/// * `bpm_b` - Candidate tempo
/// * `tolerance` - Relative difference still considered a clean mix
/// * `direction` - Desired tempo movement
///
/// With [`TempoDirection::Maintain`] the direct match is compared against
/// matches on double and half the current tempo, and the best one wins.
/// A half/double-time match only counts inside the tolerance.
/// `Faster`/`Slower` map a ±10% change onto the full [0, 1] range.
pub fn tempo_compatibility(
    bpm_a: f64,
    bpm_b: f64,
    tolerance: f64,
    direction: TempoDirection,
) -> f64 {
    let bpm_a = if bpm_a == 0.0 { 1.0 } else { bpm_a };
    let diff_pct = (bpm_b - bpm_a) / bpm_a;

    let score = match direction {
        TempoDirection::Maintain => {
            let direct = tempo_curve(diff_pct.abs(), tolerance);

            let double = bpm_a * 2.0;
            let half = bpm_a / 2.0;
            let double_score = half_double_curve((bpm_b - double).abs() / double, tolerance);
            let half_score = half_double_curve((bpm_b - half).abs() / half, tolerance);

            direct.max(double_score).max(half_score)
        }
        TempoDirection::Faster => 0.5 + diff_pct * 5.0,
        TempoDirection::Slower => 0.5 - diff_pct * 5.0,
    };

    score.clamp(0.0, 1.0)
}

/// Direct tempo curve: inside the tolerance the score falls linearly from
/// 1.0 by 0.15; beyond it, from 0.85 at twice the rate of the excess,
/// floored at 0.1.
fn tempo_curve(diff: f64, tolerance: f64) -> f64 {
    if diff <= tolerance {
        1.0 - tolerance_ratio(diff, tolerance) * 0.15
    } else {
        (0.85 - (diff - tolerance) * 2.0).max(0.1)
    }
}

/// Half/double-time curve: 0.9 at an exact 2:1 ratio, falling by 0.15
/// across the tolerance. Outside the tolerance there is no half/double match.
fn half_double_curve(diff: f64, tolerance: f64) -> f64 {
    if diff <= tolerance {
        HALF_DOUBLE_CEILING - tolerance_ratio(diff, tolerance) * 0.15
    } else {
        0.0
    }
}

fn tolerance_ratio(diff: f64, tolerance: f64) -> f64 {
    if tolerance > 0.0 {
        diff / tolerance
    } else {
        0.0
    }
}

/// Score a bounded [0, 1] feature such as energy
///
/// - `Maintain`: `1 - |b - a|`
/// - `Build`: candidates at or above `a` score from 0.5 up to 1.0 in
///   proportion to the headroom used; lower candidates score at most 0.3.
/// - `Drop`: mirror image of `Build`.
///
/// A current value of exactly 0 is treated as 0.01.
pub fn feature_compatibility(a: f64, b: f64, direction: Direction) -> f64 {
    let a = if a == 0.0 { 0.01 } else { a };
    let diff = b - a;

    let score = match direction {
        Direction::Maintain => 1.0 - diff.abs(),
        Direction::Build => {
            if diff >= 0.0 {
                if a >= 1.0 {
                    // already at the top, nothing left to build
                    0.5
                } else {
                    0.5 + (diff / (1.0 - a)) * 0.5
                }
            } else {
                (0.3 - (diff.abs() / a) * 0.4).max(0.1)
            }
        }
        Direction::Drop => {
            if diff <= 0.0 {
                0.5 + (diff.abs() / a) * 0.5
            } else if a >= 1.0 {
                0.1
            } else {
                (0.3 - (diff / (1.0 - a)) * 0.4).max(0.1)
            }
        }
    };

    score.clamp(0.0, 1.0)
}

/// Score loudness compatibility in dB
///
/// - `Maintain`: 1.0 at equal loudness, 0.0 at 6 dB apart or more
/// - `Build`: 0.5 plus 1/12 per dB louder (minus per dB quieter)
/// - `Drop`: mirror image of `Build`
///
/// An unrecognized direction (`None`) scores a neutral 0.5 rather than failing.
pub fn loudness_compatibility(db_a: f64, db_b: f64, direction: Option<Direction>) -> f64 {
    let diff = db_b - db_a;

    match direction {
        Some(Direction::Maintain) => (1.0 - diff.abs() / 6.0).max(0.0),
        Some(Direction::Build) => {
            if diff >= 0.0 {
                (0.5 + diff / 12.0).min(1.0)
            } else {
                (0.5 + diff / 12.0).max(0.0)
            }
        }
        Some(Direction::Drop) => {
            if diff <= 0.0 {
                (0.5 - diff / 12.0).min(1.0)
            } else {
                (0.5 - diff / 12.0).max(0.0)
            }
        }
        None => 0.5,
    }
}

/// Weighted cosine similarity between two feature vectors
///
/// Each dimension is scaled by `sqrt(weight)` before the cosine is taken,
/// so weights act on squared contributions. Negative similarity and empty
/// or zero vectors score 0.0.
pub fn weighted_cosine(a: &[f64], b: &[f64], weights: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() != weights.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for ((x, y), w) in a.iter().zip(b).zip(weights) {
        let w = w.max(0.0);
        dot += w * x * y;
        norm_a += w * x * x;
        norm_b += w * y * y;
    }

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}
