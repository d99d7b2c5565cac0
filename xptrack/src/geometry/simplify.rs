//! Ramer–Douglas–Peucker line simplification.
//!
//! [`simplify`] is the batch algorithm over a whole polyline. [`Simplifier`]
//! wraps it for streaming use: each candidate is tested against the last
//! retained point only, as a two-point line.
//!
//! # Degenerate lines
//!
//! A line whose retained endpoints lie within tolerance of each other, with
//! no significant point in between, collapses to its first point. This is
//! what lets the streaming filter drop a candidate that barely moved.

use thiserror::Error;

use super::{DistanceMetric, Point3};

/// Default simplification tolerance, in coordinate units.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 5.0;

/// Errors returned by [`simplify`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplifyError {
    /// No points to simplify.
    #[error("cannot simplify an empty line")]
    Empty,

    /// A point has a NaN or infinite component.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    /// The tolerance is negative or not finite.
    #[error("invalid simplification tolerance: {0}")]
    InvalidTolerance(f64),
}

/// Simplify a polyline with the Ramer–Douglas–Peucker algorithm.
///
/// Returns the retained points in their original order. The first point is
/// always retained, and so is the last unless the input is a two-point line
/// shorter than the tolerance, which collapses to its first point.
pub fn simplify(
    points: &[Point3],
    tolerance: f64,
    metric: DistanceMetric,
) -> Result<Vec<Point3>, SimplifyError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(SimplifyError::InvalidTolerance(tolerance));
    }
    if points.is_empty() {
        return Err(SimplifyError::Empty);
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(SimplifyError::NonFinite { index });
    }
    if points.len() == 1 {
        return Ok(points.to_vec());
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (index, max_distance) = (start + 1..end)
            .map(|i| {
                (
                    i,
                    metric.segment_distance(points[i], points[start], points[end]),
                )
            })
            .fold((start, 0.0_f64), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });

        if max_distance > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    let retained: Vec<Point3> = points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect();

    if points.len() == 2 && metric.distance(points[0], points[1]) <= tolerance {
        return Ok(vec![points[0]]);
    }

    Ok(retained)
}

/// Streaming point filter built on [`simplify`].
///
/// Only the last retained point is kept as state, so each decision is O(1).
#[derive(Debug, Clone, Copy)]
pub struct Simplifier {
    tolerance: f64,
    metric: DistanceMetric,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIMPLIFY_TOLERANCE, DistanceMetric::Euclidean)
    }
}

impl Simplifier {
    /// Create a simplifier with the given tolerance and metric.
    pub fn new(tolerance: f64, metric: DistanceMetric) -> Self {
        Self { tolerance, metric }
    }

    /// The configured tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The configured distance metric.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Decide whether `candidate` adds nothing over `previous`.
    ///
    /// Returns `Ok(true)` when simplifying `[previous, candidate]` drops a
    /// point.
    pub fn is_redundant(&self, previous: Point3, candidate: Point3) -> Result<bool, SimplifyError> {
        let line = [previous, candidate];
        let simplified = simplify(&line, self.tolerance, self.metric)?;
        Ok(simplified.len() < line.len())
    }
}
