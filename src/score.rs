// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG compliance score for a single audit run.

/// Minimum score for a component to count as compliant
pub const MIN_WCAG_SCORE: u32 = 95;

/// Percentage of checks passed, rounded to the nearest integer.
///
/// An audit that ran no checks scores 100.
pub fn wcag_score(pass_count: u32, violation_count: u32) -> u32 {
    let total = u64::from(pass_count) + u64::from(violation_count);
    if total == 0 {
        return 100;
    }
    // round-half-up of 100 * pass / total in integer arithmetic
    ((200 * u64::from(pass_count) + total) / (2 * total)) as u32
}

/// Round to two decimal places, as used for report percentages
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage rounded to two decimals; 100 when `whole` is zero
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 100.0;
    }
    round_hundredths(part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_checks_scores_100() {
        assert_eq!(wcag_score(0, 0), 100);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(wcag_score(19, 0), 100);
        assert_eq!(wcag_score(10, 1), 91);
        assert_eq!(wcag_score(0, 4), 0);
        assert_eq!(wcag_score(1, 1), 50);
        assert_eq!(wcag_score(2, 1), 67);
    }

    #[test]
    fn test_score_matches_formula_and_stays_in_range() {
        for pass in 0..60u32 {
            for violations in 0..60u32 {
                if pass + violations == 0 {
                    continue;
                }
                let expected =
                    (100.0 * f64::from(pass) / f64::from(pass + violations)).round() as u32;
                let score = wcag_score(pass, violations);
                assert_eq!(score, expected, "pass={pass} violations={violations}");
                assert!(score <= 100);
            }
        }
    }

    #[test]
    fn test_large_counts_do_not_overflow() {
        assert_eq!(wcag_score(u32::MAX, u32::MAX), 50);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 100.0);
        assert_eq!(round_hundredths(89.999), 90.0);
    }
}
