//! Strategies for field snapshots and basis function values in two dimensions.
use crate::assembly::BasisValues;
use crate::fields::{ScalarValues, VectorValues};
use ::proptest::prelude::*;
use nalgebra::{Matrix2, Vector2, U2};

fn vector2(range: std::ops::Range<f64>) -> impl Strategy<Value = Vector2<f64>> {
    [range.clone(), range].prop_map(|[x, y]| Vector2::new(x, y))
}

fn matrix2(range: std::ops::Range<f64>) -> impl Strategy<Value = Matrix2<f64>> {
    [range.clone(), range.clone(), range.clone(), range].prop_map(|[a, b, c, d]| Matrix2::new(a, b, c, d))
}

fn symmetric_matrix2(range: std::ops::Range<f64>) -> impl Strategy<Value = Matrix2<f64>> {
    [range.clone(), range.clone(), range].prop_map(|[a, b, d]| Matrix2::new(a, b, b, d))
}

/// Scalar values with all entries in `[-1, 1)` and a symmetric Hessian.
pub fn scalar_values2() -> impl Strategy<Value = ScalarValues<f64, U2>> {
    (-1.0..1.0, vector2(-1.0..1.0), symmetric_matrix2(-1.0..1.0))
        .prop_map(|(value, gradient, hessian)| ScalarValues::new(value, gradient, hessian))
}

/// Concentration-like scalar values with the value in `[0, 1)`.
pub fn phase_field_values2() -> impl Strategy<Value = ScalarValues<f64, U2>> {
    (0.0..1.0, vector2(-1.0..1.0), symmetric_matrix2(-1.0..1.0))
        .prop_map(|(value, gradient, hessian)| ScalarValues::new(value, gradient, hessian))
}

/// Displacement values whose gradient stays close enough to zero for `I + grad u` to be
/// invertible with positive determinant.
pub fn displacement_values2() -> impl Strategy<Value = VectorValues<f64, U2>> {
    (
        vector2(-1.0..1.0),
        matrix2(-0.3..0.3),
        symmetric_matrix2(-0.5..0.5),
        symmetric_matrix2(-0.5..0.5),
    )
        .prop_map(|(value, gradient, h0, h1)| VectorValues::new(value, gradient, vec![h0, h1]))
}

/// Arbitrary test function values for a scalar field.
pub fn scalar_test_values2() -> impl Strategy<Value = ScalarValues<f64, U2>> {
    scalar_values2()
}

/// Arbitrary test function values for a vector field.
pub fn vector_test_values2() -> impl Strategy<Value = VectorValues<f64, U2>> {
    (
        vector2(-1.0..1.0),
        matrix2(-1.0..1.0),
        symmetric_matrix2(-1.0..1.0),
        symmetric_matrix2(-1.0..1.0),
    )
        .prop_map(|(value, gradient, h0, h1)| VectorValues::new(value, gradient, vec![h0, h1]))
}

/// Values of `count` basis functions at a single point.
pub fn basis_values2(count: usize) -> impl Strategy<Value = Vec<BasisValues<U2>>> {
    prop::collection::vec(
        (0.0..1.0, vector2(-2.0..2.0), symmetric_matrix2(-2.0..2.0))
            .prop_map(|(value, gradient, hessian)| BasisValues::new(value, gradient, hessian)),
        count,
    )
}
