//! Small dense tensor operations over the differentiable scalar [`Real`].
//!
//! `nalgebra` only provides determinants and inverses for `ComplexField` scalars, which dual
//! numbers are not, so the few closed-form operations the kernels need live here.
use crate::allocators::DimAllocator;
use crate::nalgebra::{DefaultAllocator, OMatrix, OVector};
use crate::{Real, SmallDim};

/// Determinant of a square matrix of dimension 1, 2 or 3.
pub fn determinant<T, D>(m: &OMatrix<T, D, D>) -> T
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    match D::dim() {
        1 => m[(0, 0)],
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        3 => {
            m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
                - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
                + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
        }
        d => panic!("determinant is only implemented for dimensions 1 to 3, got {}", d),
    }
}

/// Adjugate (transposed cofactor matrix) of a square matrix of dimension 1, 2 or 3.
pub fn adjugate<T, D>(m: &OMatrix<T, D, D>) -> OMatrix<T, D, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    match D::dim() {
        1 => OMatrix::<T, D, D>::from_element(T::one()),
        2 => OMatrix::<T, D, D>::from_fn(|i, j| match (i, j) {
            (0, 0) => m[(1, 1)],
            (0, 1) => -m[(0, 1)],
            (1, 0) => -m[(1, 0)],
            _ => m[(0, 0)],
        }),
        3 => OMatrix::<T, D, D>::from_fn(|i, j| {
            let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            m[(j1, i1)] * m[(j2, i2)] - m[(j1, i2)] * m[(j2, i1)]
        }),
        d => panic!("adjugate is only implemented for dimensions 1 to 3, got {}", d),
    }
}

/// Inverse of a square matrix of dimension 1, 2 or 3.
///
/// There is no singularity check: a singular matrix produces non-finite entries, which then
/// propagate through the residual.
pub fn inverse<T, D>(m: &OMatrix<T, D, D>) -> OMatrix<T, D, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    adjugate(m) / determinant(m)
}

/// Converts a geometric `f64` vector (coordinates, normals) into a vector of kernel scalars.
pub fn lift_vector<T, D>(v: &OVector<f64, D>) -> OVector<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    v.map(|x| T::from(x))
}

/// Converts an `f64` matrix into a matrix of kernel scalars.
pub fn lift_matrix<T, D>(m: &OMatrix<f64, D, D>) -> OMatrix<T, D, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    m.map(|x| T::from(x))
}
