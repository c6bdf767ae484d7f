//! Time-driven difficulty
//!
//! Difficulty is never stored: it is recomputed from the round clock.

use serde::{Deserialize, Serialize};

use crate::tuning::{Curve, DifficultyTuning};

/// Multipliers applied to pattern speed and count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub speed_mul: f32,
    pub count_mul: f32,
}

impl Difficulty {
    /// Scale a base count, never going under `min`
    pub fn scaled_count(&self, base: u32, min: u32) -> usize {
        let scaled = (base as f32 * self.count_mul).floor();
        let scaled = if scaled.is_finite() && scaled > 0.0 {
            scaled as u32
        } else {
            0
        };
        scaled.max(min) as usize
    }
}

/// Fraction of the way from grace end to full growth, in [0, 1]
pub fn growth_progress(elapsed: f32, tuning: &DifficultyTuning) -> f32 {
    let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
    if elapsed <= tuning.grace_secs {
        return 0.0;
    }
    if tuning.time_to_max_secs <= 0.0 {
        return 1.0;
    }
    ((elapsed - tuning.grace_secs) / tuning.time_to_max_secs).clamp(0.0, 1.0)
}

#[inline]
fn curve_at(curve: &Curve, progress: f32) -> f32 {
    (curve.base + curve.growth * progress).min(curve.cap)
}

/// Difficulty multipliers for a round that has run `elapsed` seconds
pub fn compute_difficulty(elapsed: f32, tuning: &DifficultyTuning) -> Difficulty {
    let progress = growth_progress(elapsed, tuning);
    Difficulty {
        speed_mul: curve_at(&tuning.speed, progress),
        count_mul: curve_at(&tuning.count, progress),
    }
}

/// Whether the round is still inside its opening grace period
#[inline]
pub fn in_grace(elapsed: f32, tuning: &DifficultyTuning) -> bool {
    elapsed < tuning.grace_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flat_during_grace() {
        let tuning = DifficultyTuning::default();
        let start = compute_difficulty(0.0, &tuning);
        let end_of_grace = compute_difficulty(tuning.grace_secs, &tuning);
        assert_eq!(start, end_of_grace);
        assert_eq!(start.speed_mul, tuning.speed.base);
        assert_eq!(start.count_mul, tuning.count.base);
    }

    #[test]
    fn test_saturates_at_caps() {
        let tuning = DifficultyTuning {
            speed: Curve {
                base: 1.0,
                growth: 5.0,
                cap: 1.5,
            },
            ..Default::default()
        };
        let late = compute_difficulty(10_000.0, &tuning);
        assert_eq!(late.speed_mul, 1.5);
        assert_eq!(late.count_mul, tuning.count.base + tuning.count.growth);
    }

    #[test]
    fn test_linear_midpoint() {
        let tuning = DifficultyTuning::default();
        let mid = tuning.grace_secs + tuning.time_to_max_secs / 2.0;
        let d = compute_difficulty(mid, &tuning);
        let expected = tuning.speed.base + tuning.speed.growth * 0.5;
        assert!((d.speed_mul - expected).abs() < 1e-5);
    }

    #[test]
    fn test_negative_and_nan_elapsed() {
        let tuning = DifficultyTuning::default();
        assert_eq!(compute_difficulty(-5.0, &tuning), compute_difficulty(0.0, &tuning));
        assert_eq!(compute_difficulty(f32::NAN, &tuning), compute_difficulty(0.0, &tuning));
    }

    #[test]
    fn test_scaled_count_floor() {
        let d = Difficulty {
            speed_mul: 1.0,
            count_mul: 0.2,
        };
        assert_eq!(d.scaled_count(14, 8), 8);
        let d = Difficulty {
            speed_mul: 1.0,
            count_mul: 1.5,
        };
        assert_eq!(d.scaled_count(10, 8), 15);
    }

    proptest! {
        #[test]
        fn prop_monotonic_and_capped(t1 in 0.0f32..500.0, extra in 0.0f32..500.0) {
            let tuning = DifficultyTuning::default();
            let t2 = t1 + extra;
            let a = compute_difficulty(t1, &tuning);
            let b = compute_difficulty(t2, &tuning);
            prop_assert!(b.speed_mul >= a.speed_mul);
            prop_assert!(b.count_mul >= a.count_mul);
            prop_assert!(b.speed_mul <= tuning.speed.cap);
            prop_assert!(b.count_mul <= tuning.count.cap);
        }
    }
}
