/// Deepest 1-indexed level of `ladder` reached by `drawdown`.
///
/// Level `i` is reached when `drawdown <= ladder[i - 1]`. The ladder is
/// scanned left to right and the last satisfied index wins, so a ladder that
/// is not shallow-to-deep is still evaluated exactly as listed rather than
/// being reordered.
pub fn decide_level(drawdown: f64, ladder: &[f64]) -> Option<usize> {
    let mut hit = None;
    for (idx, threshold) in ladder.iter().enumerate() {
        if drawdown <= *threshold {
            hit = Some(idx + 1);
        }
    }
    hit
}

/// True when every threshold is at or below the one before it
pub fn ladder_is_monotonic(ladder: &[f64]) -> bool {
    ladder.windows(2).all(|pair| pair[1] <= pair[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    const LADDER: [f64; 3] = [-0.30, -0.55, -0.75];

    #[test]
    fn no_level_above_first_threshold() {
        for drawdown in [0.0, -0.01, -0.15, -0.2999] {
            assert_eq!(decide_level(drawdown, &LADDER), None, "drawdown {drawdown}");
        }
    }

    #[test]
    fn returns_deepest_level_reached() {
        assert_eq!(decide_level(-0.40, &LADDER), Some(1));
        assert_eq!(decide_level(-0.60, &LADDER), Some(2));
        assert_eq!(decide_level(-0.90, &LADDER), Some(3));
    }

    #[test]
    fn threshold_itself_counts_as_reached() {
        assert_eq!(decide_level(-0.30, &LADDER), Some(1));
        assert_eq!(decide_level(-0.55, &LADDER), Some(2));
        assert_eq!(decide_level(-0.75, &LADDER), Some(3));
    }

    #[test]
    fn empty_ladder_never_hits() {
        assert_eq!(decide_level(-0.99, &[]), None);
    }

    #[test]
    fn non_monotonic_ladder_returns_last_satisfied_index() {
        // -0.40 satisfies level 2 (-0.20) but not level 1 (-0.50)
        let ladder = [-0.50, -0.20];
        assert_eq!(decide_level(-0.40, &ladder), Some(2));
        assert_eq!(decide_level(-0.60, &ladder), Some(2));
        assert!(!ladder_is_monotonic(&ladder));
    }

    #[test]
    fn monotonic_check_allows_equal_steps() {
        assert!(ladder_is_monotonic(&LADDER));
        assert!(ladder_is_monotonic(&[-0.30, -0.30]));
        assert!(ladder_is_monotonic(&[-0.30]));
    }
}
