//! Interpolating splines keyed by a strictly increasing parameter
//!
//! Four or more knots get a not-a-knot cubic (the same end conditions as an
//! unsmoothed FITPACK fit). Two or three knots fall back to piecewise linear.
//! Both pass exactly through every knot.

use crate::{GeometryError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Minimum knot count for the cubic fit
pub const CUBIC_MIN_KNOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    NotAKnotCubic,
}

/// One-dimensional interpolating spline stored as knot values plus second
/// derivatives. A linear spline is the special case of all-zero second
/// derivatives.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    second: Vec<f64>,
    kind: Interpolation,
}

impl CubicSpline {
    pub fn fit(knots: &[f64], values: &[f64]) -> Result<Self> {
        validate_knots(knots)?;
        if knots.len() != values.len() {
            return Err(GeometryError::LengthMismatch {
                knots: knots.len(),
                values: values.len(),
            });
        }

        let (second, kind) = if knots.len() >= CUBIC_MIN_KNOTS {
            (not_a_knot_second_derivatives(knots, values), Interpolation::NotAKnotCubic)
        } else {
            (vec![0.0; knots.len()], Interpolation::Linear)
        };

        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            second,
            kind,
        })
    }

    pub fn kind(&self) -> Interpolation {
        self.kind
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.evaluate_segment(locate(&self.knots, x), x)
    }

    fn evaluate_segment(&self, seg: usize, x: f64) -> f64 {
        let (x0, x1) = (self.knots[seg], self.knots[seg + 1]);
        let (y0, y1) = (self.values[seg], self.values[seg + 1]);
        let (m0, m1) = (self.second[seg], self.second[seg + 1]);
        let h = x1 - x0;
        let t = x - x0;
        let u = x1 - x;

        m0 * u.powi(3) / (6.0 * h)
            + m1 * t.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * u
            + (y1 / h - m1 * h / 6.0) * t
    }
}

/// Three coordinate splines over a shared parameter
#[derive(Debug, Clone)]
pub struct SplineCurve3 {
    axes: [CubicSpline; 3],
}

impl SplineCurve3 {
    pub fn fit(knots: &[f64], points: &[Vector3<f64>]) -> Result<Self> {
        let column = |axis: usize| points.iter().map(|p| p[axis]).collect::<Vec<_>>();
        Ok(Self {
            axes: [
                CubicSpline::fit(knots, &column(0))?,
                CubicSpline::fit(knots, &column(1))?,
                CubicSpline::fit(knots, &column(2))?,
            ],
        })
    }

    pub fn kind(&self) -> Interpolation {
        self.axes[0].kind
    }

    pub fn knots(&self) -> &[f64] {
        &self.axes[0].knots
    }

    pub fn evaluate(&self, x: f64) -> Vector3<f64> {
        self.evaluate_segment(locate(self.knots(), x), x)
    }

    /// Evaluate with a segment hint; the hint is updated to the segment used.
    pub fn evaluate_from(&self, x: f64, hint: &mut usize) -> Vector3<f64> {
        *hint = locate_from(self.knots(), x, *hint);
        self.evaluate_segment(*hint, x)
    }

    fn evaluate_segment(&self, seg: usize, x: f64) -> Vector3<f64> {
        Vector3::new(
            self.axes[0].evaluate_segment(seg, x),
            self.axes[1].evaluate_segment(seg, x),
            self.axes[2].evaluate_segment(seg, x),
        )
    }
}

fn validate_knots(knots: &[f64]) -> Result<()> {
    if knots.len() < 2 {
        return Err(GeometryError::TooFewKnots(knots.len()));
    }
    for (i, pair) in knots.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(GeometryError::NonMonotonicKnots(i + 1));
        }
    }
    Ok(())
}

/// Index of the interval containing `x`. Values outside the knot range map to
/// the first or last interval, which then extrapolates.
fn locate(knots: &[f64], x: f64) -> usize {
    let last_segment = knots.len() - 2;
    knots.partition_point(|k| *k <= x).saturating_sub(1).min(last_segment)
}

/// Interval lookup that checks the hinted interval and its successor before
/// falling back to binary search. Monotone query sequences with small steps
/// resolve in O(1).
fn locate_from(knots: &[f64], x: f64, hint: usize) -> usize {
    let last_segment = knots.len() - 2;
    let seg = hint.min(last_segment);
    let contains = |s: usize| {
        (s == 0 || knots[s] <= x) && (s == last_segment || x < knots[s + 1])
    };

    if contains(seg) {
        seg
    } else if seg < last_segment && contains(seg + 1) {
        seg + 1
    } else {
        locate(knots, x)
    }
}

/// Second derivatives of the not-a-knot cubic through (knots, values).
///
/// The third derivative is continuous across the second and second-to-last
/// knots. Substituting those two conditions into the first and last interior
/// rows leaves a diagonally dominant tridiagonal system in M[1..n-1].
fn not_a_knot_second_derivatives(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let n = knots.len();
    let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = (0..n - 1).map(|i| (values[i + 1] - values[i]) / h[i]).collect();

    // Unknowns M[1..=n-2], stored at 0..m
    let m = n - 2;
    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![0.0; m];

    for row in 0..m {
        let i = row + 1;
        sub[row] = h[i - 1];
        diag[row] = 2.0 * (h[i - 1] + h[i]);
        sup[row] = h[i];
        rhs[row] = 6.0 * (slope[i] - slope[i - 1]);
    }

    // M0 = ((h0 + h1) M1 - h0 M2) / h1
    diag[0] = (h[0] + h[1]) * (h[0] + 2.0 * h[1]) / h[1];
    sup[0] = (h[1] * h[1] - h[0] * h[0]) / h[1];
    sub[0] = 0.0;

    // M[n-1] = ((h[n-3] + h[n-2]) M[n-2] - h[n-2] M[n-3]) / h[n-3]
    let (ha, hb) = (h[n - 3], h[n - 2]);
    diag[m - 1] = (ha + hb) * (2.0 * ha + hb) / ha;
    sub[m - 1] = (ha * ha - hb * hb) / ha;
    sup[m - 1] = 0.0;

    let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);

    let mut second = vec![0.0; n];
    second[1..n - 1].copy_from_slice(&interior);
    second[0] = ((h[0] + h[1]) * second[1] - h[0] * second[2]) / h[1];
    second[n - 1] = ((ha + hb) * second[n - 2] - hb * second[n - 3]) / ha;
    second
}

/// Thomas algorithm. Callers guarantee diagonal dominance, so no pivoting.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_interpolates_knots() {
        let knots = [0.0, 1.0, 2.5, 3.0, 4.2, 6.0];
        let values = [1.0, -2.0, 0.5, 3.0, 2.0, -1.0];
        let spline = CubicSpline::fit(&knots, &values).unwrap();
        assert_eq!(spline.kind(), Interpolation::NotAKnotCubic);
        for (x, y) in knots.iter().zip(values.iter()) {
            assert!((spline.evaluate(*x) - y).abs() < EPSILON, "miss at {}", x);
        }
    }

    #[test]
    fn test_reproduces_cubic_exactly() {
        // Not-a-knot reproduces any single cubic polynomial
        let f = |x: f64| 0.5 * x.powi(3) - 2.0 * x * x + x - 3.0;
        let knots = [0.0, 0.7, 1.5, 2.0, 3.1, 4.0, 5.5];
        let values: Vec<f64> = knots.iter().map(|x| f(*x)).collect();
        let spline = CubicSpline::fit(&knots, &values).unwrap();
        for i in 0..=55 {
            let x = i as f64 * 0.1;
            assert!((spline.evaluate(x) - f(x)).abs() < 1e-8, "x = {}", x);
        }
    }

    #[test]
    fn test_four_knots_single_cubic() {
        let f = |x: f64| x.powi(3) - x;
        let knots = [0.0, 1.0, 3.0, 4.0];
        let values: Vec<f64> = knots.iter().map(|x| f(*x)).collect();
        let spline = CubicSpline::fit(&knots, &values).unwrap();
        assert!((spline.evaluate(2.0) - f(2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fallback() {
        let spline = CubicSpline::fit(&[0.0, 2.0, 4.0], &[0.0, 4.0, 0.0]).unwrap();
        assert_eq!(spline.kind(), Interpolation::Linear);
        assert!((spline.evaluate(1.0) - 2.0).abs() < EPSILON);
        assert!((spline.evaluate(3.0) - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_rejects_bad_knots() {
        assert_eq!(
            CubicSpline::fit(&[0.0], &[1.0]).unwrap_err(),
            GeometryError::TooFewKnots(1)
        );
        assert_eq!(
            CubicSpline::fit(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap_err(),
            GeometryError::NonMonotonicKnots(2)
        );
        assert!(matches!(
            CubicSpline::fit(&[0.0, 1.0], &[1.0]),
            Err(GeometryError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_locate_clamps_to_end_intervals() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(locate(&knots, -5.0), 0);
        assert_eq!(locate(&knots, 0.0), 0);
        assert_eq!(locate(&knots, 1.0), 1);
        assert_eq!(locate(&knots, 2.999), 2);
        assert_eq!(locate(&knots, 3.0), 2);
        assert_eq!(locate(&knots, 10.0), 2);
    }

    #[test]
    fn test_locate_from_matches_locate() {
        let knots = [0.0, 0.5, 1.7, 2.0, 3.3, 4.0];
        let mut hint = 0;
        let mut x = -0.2;
        while x < 4.5 {
            hint = locate_from(&knots, x, hint);
            assert_eq!(hint, locate(&knots, x), "x = {}", x);
            x += 0.05;
        }
        // Backwards jumps still resolve
        assert_eq!(locate_from(&knots, 0.1, 4), 0);
    }

    #[test]
    fn test_curve_passes_through_points() {
        let knots: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
        let points: Vec<Vector3<f64>> = knots
            .iter()
            .map(|t| Vector3::new(t.cos(), t.sin(), 0.1 * t))
            .collect();
        let curve = SplineCurve3::fit(&knots, &points).unwrap();
        let mut hint = 0;
        for (t, p) in knots.iter().zip(points.iter()) {
            assert!((curve.evaluate(*t) - p).norm() < EPSILON);
            assert!((curve.evaluate_from(*t, &mut hint) - p).norm() < EPSILON);
        }
    }
}
