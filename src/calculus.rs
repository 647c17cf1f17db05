//! Central finite differences for checking residual Jacobians and energy gradients.
use crate::nalgebra::{DMatrix, DVector};
use crate::Real;

/// Central difference of `f` at `x` in the direction of the coordinate axis `j`.
fn central_difference<T, F>(x: &DVector<T>, j: usize, h: T, f: &mut F) -> DVector<T>
where
    T: Real,
    F: FnMut(&DVector<T>) -> DVector<T>,
{
    let mut x_shifted = x.clone();
    x_shifted[j] = x[j] + h;
    let f_forward = f(&x_shifted);
    x_shifted[j] = x[j] - h;
    let f_backward = f(&x_shifted);
    (f_forward - f_backward) / (h + h)
}

/// Finite difference approximation of the Jacobian $J_{ij} = \partial f_i / \partial x_j$ of
/// $f: \mathbb{R}^n \rightarrow \mathbb{R}^m$ at `x`, with step size `h`.
///
/// `f` is evaluated twice per coordinate and must return vectors of the same length every time.
pub fn approximate_jacobian_fd<T, F>(x: &DVector<T>, h: T, mut f: F) -> DMatrix<T>
where
    T: Real,
    F: FnMut(&DVector<T>) -> DVector<T>,
{
    if x.is_empty() {
        return DMatrix::zeros(f(x).len(), 0);
    }
    let columns: Vec<_> = (0..x.len())
        .map(|j| central_difference(x, j, h, &mut f))
        .collect();
    DMatrix::from_columns(&columns)
}

/// Finite difference approximation of the gradient of a scalar function at `x`.
pub fn approximate_gradient_fd<T, F>(x: &DVector<T>, h: T, mut f: F) -> DVector<T>
where
    T: Real,
    F: FnMut(&DVector<T>) -> T,
{
    approximate_jacobian_fd(x, h, |y| DVector::from_element(1, f(y)))
        .row(0)
        .transpose()
}
