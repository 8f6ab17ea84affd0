// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Simple, auxiliary functions and constants used through the `hillwatch` library.

use std::time::Duration;

/******************************/
/*         CONSTANTS          */
/******************************/

/// Number of picoseconds (Gromacs time unit) in one nanosecond.
pub const PS_PER_NS: f64 = 1000.0;

/// Default time since the last modification of the log file
/// after which the simulation is no longer considered to be running.
pub const DEFAULT_LIVENESS_THRESHOLD: Duration = Duration::from_secs(300);

/// Default time between two polls of the simulation output files.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Minimal number of columns in a HILLS file.
pub const HILLS_MIN_COLUMNS: usize = 6;

/// Index of the column containing time (in ps) in a HILLS file.
pub const HILLS_TIME: usize = 0;
/// Index of the column containing the first collective variable.
pub const HILLS_CV1: usize = 1;
/// Index of the column containing the second collective variable.
pub const HILLS_CV2: usize = 2;
/// Index of the column containing the height of the deposited hill.
pub const HILLS_HEIGHT: usize = 5;

/******************************/
/*        TEXT PARSING        */
/******************************/

/// Check whether the line of a numeric text file carries no data.
/// Empty lines and comments (`#`, used by PLUMED, and `@`, used by xmgrace) carry no data.
#[inline(always)]
pub(crate) fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('@')
}

/// Parse a whitespace-delimited line of floating point numbers.
/// Returns `None` if any of the fields is not a number.
pub(crate) fn parse_numeric_line(line: &str) -> Option<Vec<f64>> {
    line.split_whitespace()
        .map(|field| field.parse::<f64>().ok())
        .collect()
}

/// Get the minimum and maximum of the values, padded so that the range is never empty.
/// Returns `(-1.0, 1.0)` for an empty iterator.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| {
            (min.min(x), max.max(x))
        });

    if min > max {
        return (-1.0, 1.0);
    }

    let pad = if max - min > 0.0 {
        (max - min) * 0.05
    } else {
        0.5
    };

    (min - pad, max + pad)
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn blank_or_comment() {
        assert!(is_blank_or_comment(""));
        assert!(is_blank_or_comment("   \t"));
        assert!(is_blank_or_comment("#! FIELDS time cv1 cv2"));
        assert!(is_blank_or_comment("  # comment"));
        assert!(is_blank_or_comment("@    title \"RMSD\""));
        assert!(!is_blank_or_comment("  0.0 1.0"));
    }

    #[test]
    fn numeric_line() {
        assert_eq!(
            parse_numeric_line("  1.0 -2.5e-1\t3 "),
            Some(vec![1.0, -0.25, 3.0])
        );
        assert_eq!(parse_numeric_line("1.0 two 3.0"), None);
        assert_eq!(parse_numeric_line(""), Some(vec![]));
    }

    #[test]
    fn range_regular() {
        let (min, max) = padded_range([0.0, 10.0, 5.0].into_iter());
        assert_approx_eq!(f64, min, -0.5);
        assert_approx_eq!(f64, max, 10.5);
    }

    #[test]
    fn range_single_value() {
        let (min, max) = padded_range(std::iter::once(3.0));
        assert_approx_eq!(f64, min, 2.5);
        assert_approx_eq!(f64, max, 3.5);
    }

    #[test]
    fn range_empty_or_nan() {
        assert_eq!(padded_range(std::iter::empty()), (-1.0, 1.0));
        assert_eq!(padded_range([f64::NAN].into_iter()), (-1.0, 1.0));
    }
}
