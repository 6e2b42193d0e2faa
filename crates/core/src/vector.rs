//! Small helpers for nodal value vectors.
//!
//! Backends are free to use richer linear algebra internally. The solvers only
//! need these few operations on plain slices.

/// Euclidean inner product of two equally sized slices.
///
/// # Panics
///
/// Panics in debug builds if the lengths differ.
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "dot: length mismatch");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
#[must_use]
pub fn norm_l2(values: &[f64]) -> f64 {
    dot(values, values).sqrt()
}

/// Maximum absolute entry, zero for an empty slice.
#[must_use]
pub fn norm_inf(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

/// Computes `y += alpha * x` in place.
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len(), "axpy: length mismatch");
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// Returns `-x` as a new vector.
#[must_use]
pub fn negated(x: &[f64]) -> Vec<f64> {
    x.iter().map(|v| -v).collect()
}
