//! XP curve math shared by the message pipeline, the admin commands,
//! and the rank/leaderboard rendering.

/// Cumulative XP threshold required to reach `level`.
///
/// The curve is `5·level² + 50·level + 100`: quadratic, so every level
/// costs more than the one before it. Strictly increasing, which keeps
/// the progress math below well-defined. Saturates only far beyond any
/// total a BIGINT xp column can hold.
pub fn xp_for_level(level: u64) -> u64 {
    5u64.saturating_mul(level.saturating_mul(level))
        .saturating_add(50u64.saturating_mul(level))
        .saturating_add(100)
}

/// Percentage progress from `level` toward `level + 1`, clamped to `[0, 100]`.
///
/// Totals outside the level's bracket (stale rows, admin edits landing
/// mid-read) clamp instead of erroring: rendered bars must never leave
/// the `[0, 100]` range.
pub fn progress_percent(xp: u64, level: u64) -> f64 {
    let this_level = xp_for_level(level);
    let next_level = xp_for_level(level + 1);
    if next_level <= this_level {
        // Saturated bracket; nothing left to climb.
        return 100.0;
    }

    let span = (next_level - this_level) as f64;
    let raw = 100.0 * (xp as f64 - this_level as f64) / span;
    raw.clamp(0.0, 100.0)
}

/// Highest level whose threshold is covered by `xp`.
///
/// The ladder starts at `xp_for_level(0) == 100`, so totals below that
/// sit at level 0. The closed-form root of the quadratic gives an
/// estimate; the integer predicate settles the boundary, so float
/// rounding near a threshold cannot skew the result.
pub fn level_for_xp(xp: u64) -> u64 {
    if xp < xp_for_level(0) {
        return 0;
    }

    // 5n² + 50n + 100 <= xp, solved for n.
    let estimate = ((20.0 * xp as f64 + 500.0).sqrt() - 50.0) / 10.0;
    let mut level = estimate.max(0.0) as u64;

    while xp_for_level(level.saturating_add(1)) <= xp {
        level += 1;
    }
    while level > 0 && xp_for_level(level) > xp {
        level -= 1;
    }

    level
}

/// XP earned past `level`'s threshold, clamped into the bracket.
pub fn xp_into_level(xp: u64, level: u64) -> u64 {
    let this_level = xp_for_level(level);
    let next_level = xp_for_level(level + 1);
    xp.clamp(this_level, next_level) - this_level
}

/// Width of the XP bracket between `level` and `level + 1`.
pub fn xp_span_of_level(level: u64) -> u64 {
    xp_for_level(level + 1).saturating_sub(xp_for_level(level))
}

#[cfg(test)]
mod tests {
    use super::{level_for_xp, progress_percent, xp_for_level, xp_into_level, xp_span_of_level};

    #[test]
    fn thresholds_match_the_curve() {
        assert_eq!(xp_for_level(0), 100);
        assert_eq!(xp_for_level(1), 155);
        assert_eq!(xp_for_level(10), 1100);
    }

    #[test]
    fn curve_is_strictly_increasing() {
        for level in 0..5_000 {
            assert!(xp_for_level(level + 1) > xp_for_level(level));
        }
    }

    #[test]
    fn progress_is_zero_at_own_threshold() {
        assert_eq!(progress_percent(xp_for_level(5), 5), 0.0);
    }

    #[test]
    fn progress_just_below_next_threshold_stays_under_100() {
        let percent = progress_percent(xp_for_level(6) - 1, 5);
        assert!(percent < 100.0);
        assert!(percent > 99.0);
    }

    #[test]
    fn progress_clamps_totals_outside_the_bracket() {
        // 0 XP is below the level-0 threshold of 100; the raw fraction
        // would be negative.
        assert_eq!(progress_percent(0, 0), 0.0);
        // Total far beyond a stale stored level.
        assert_eq!(progress_percent(1_000_000, 3), 100.0);
    }

    #[test]
    fn progress_never_leaves_bounds() {
        for level in 0..200 {
            for xp in [0, 50, 99, 100, 101, 154, 155, 1_000, 10_000, 9_999_999] {
                let percent = progress_percent(xp, level);
                assert!(
                    (0.0..=100.0).contains(&percent),
                    "progress {percent} out of range for xp={xp} level={level}"
                );
            }
        }
    }

    #[test]
    fn level_roundtrips_through_thresholds() {
        for level in 0..2_000 {
            assert_eq!(level_for_xp(xp_for_level(level)), level);
        }
    }

    #[test]
    fn level_steps_down_just_below_thresholds() {
        for level in 1..2_000 {
            assert_eq!(level_for_xp(xp_for_level(level) - 1), level - 1);
        }
    }

    #[test]
    fn sub_threshold_totals_sit_at_level_zero() {
        for xp in 0..100 {
            assert_eq!(level_for_xp(xp), 0);
        }
    }

    #[test]
    fn bracket_helpers_agree_with_the_curve() {
        assert_eq!(xp_span_of_level(5), xp_for_level(6) - xp_for_level(5));
        assert_eq!(xp_into_level(xp_for_level(5), 5), 0);
        assert_eq!(xp_into_level(xp_for_level(6), 5), xp_span_of_level(5));
        // Clamped below the bracket, like the percentage.
        assert_eq!(xp_into_level(0, 0), 0);
    }
}
