//! Simple linear regression via the closed-form normal equations.
//!
//! Every regression this crate runs is of the one-dimensional form
//!
//! ```text
//! minimize Σ (y_i - (m x_i + b))^2
//! ```
//!
//! so the textbook sums are all we need:
//!
//! ```text
//! m = (n Σxy - Σx Σy) / (n Σx² - (Σx)²)
//! b = (Σy - m Σx) / n
//! ```
//!
//! The denominator is zero exactly when every x is the same (or n = 0), in
//! which case no line is defined and the fit reports `None` rather than
//! producing infinities or NaN.

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsLine {
    pub slope: f64,
    pub intercept: f64,
}

impl OlsLine {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Denominators smaller than this are treated as degenerate. With integer
/// year inputs, any two distinct x values make the denominator at least 1,
/// so the guard only fires for genuinely flat input.
const DEGENERATE_EPS: f64 = 1e-9;

/// Fit a line through `(x, y)` pairs.
///
/// Returns `None` when fewer than two points are given or when all x values
/// coincide. Never returns non-finite parameters.
pub fn fit_line(points: &[(f64, f64)]) -> Option<OlsLine> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denom = nf * sum_x2 - sum_x * sum_x;
    if denom.abs() < DEGENERATE_EPS {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }

    Some(OlsLine { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        // y = 3x + 2 on x = [0, 1, 2]
        let pts = [(0.0, 2.0), (1.0, 5.0), (2.0, 8.0)];
        let line = fit_line(&pts).unwrap();
        assert!((line.slope - 3.0).abs() < 1e-10);
        assert!((line.intercept - 2.0).abs() < 1e-10);
    }

    #[test]
    fn fits_noisy_points_with_balanced_residuals() {
        // Symmetric noise around y = x keeps the fit on y = x.
        let pts = [(0.0, 0.5), (1.0, 0.5), (2.0, 2.5), (3.0, 2.5)];
        let line = fit_line(&pts).unwrap();
        let residual_sum: f64 = pts.iter().map(|&(x, y)| y - line.value_at(x)).sum();
        assert!(residual_sum.abs() < 1e-9);
    }

    #[test]
    fn single_point_is_degenerate() {
        assert_eq!(fit_line(&[(5.0, 1.0)]), None);
    }

    #[test]
    fn vertical_stack_is_degenerate() {
        // All x equal: slope undefined, must not divide by zero.
        let pts = [(2000.0, 1.0), (2000.0, 3.0), (2000.0, 5.0)];
        assert_eq!(fit_line(&pts), None);
    }

    #[test]
    fn empty_input_is_degenerate() {
        assert_eq!(fit_line(&[]), None);
    }

    #[test]
    fn two_distinct_points_fit_exactly() {
        let pts = [(2000.0, 0.0), (2001.0, 2.0)];
        let line = fit_line(&pts).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-9);
        assert!((line.value_at(2000.0)).abs() < 1e-9);
        assert!((line.value_at(2001.0) - 2.0).abs() < 1e-9);
    }
}
