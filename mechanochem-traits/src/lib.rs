use nalgebra::{DimMin, DimName, Scalar};
use num_dual::DualNum;

pub use nalgebra;
pub use num_dual;

/// A real scalar that may carry derivative information.
///
/// Physics kernels are written once against this trait and evaluated both with plain `f64`
/// (residual values) and with the dual numbers of `num_dual` (Jacobian entries by forward-mode
/// automatic differentiation).
pub trait Real: DualNum<f64> + Scalar + Copy {}

impl<T: DualNum<f64> + Scalar + Copy> Real for T {}

/// A small, fixed-size spatial dimension.
///
/// Used as a trait alias for the traits frequently needed by dimension-generic kernels.
pub trait SmallDim: DimName + DimMin<Self, Output = Self> {}

impl<D> SmallDim for D where D: DimName + DimMin<Self, Output = Self> {}

pub mod allocators;
