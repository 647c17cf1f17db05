//! Helper traits for allocator trait bounds.
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, Scalar, U1};

/// An allocator for the vectors and square matrices of a single spatial dimension.
///
/// Geometric data (coordinates, normals, basis function derivatives) is always `f64`, while
/// field data uses the kernel scalar `T`, so both are provided.
pub trait DimAllocator<T: Scalar, D: DimName>:
    Allocator<T, D>
    + Allocator<T, D, D>
    + Allocator<T, U1, D>
    + Allocator<f64, D>
    + Allocator<f64, D, D>
    + Allocator<f64, U1, D>
    + Allocator<usize, D>
    + Allocator<bool, D>
{
}

impl<T, D> DimAllocator<T, D> for DefaultAllocator
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>
        + Allocator<T, D, D>
        + Allocator<T, U1, D>
        + Allocator<f64, D>
        + Allocator<f64, D, D>
        + Allocator<f64, U1, D>
        + Allocator<usize, D>
        + Allocator<bool, D>,
{
}
