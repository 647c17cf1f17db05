//! The pointwise weak-form residual contract.
use crate::allocators::DimAllocator;
use crate::fields::{SolutionScalars, SolutionVectors, TestScalars, TestVectors};
use crate::nalgebra::{DefaultAllocator, OPoint, OVector};
use crate::parameters::ProblemContext;
use crate::tensor::lift_vector;
use crate::{Real, SmallDim};

/// Selects which integral a kernel call contributes to.
///
/// The two flags act as multipliers (1 or 0) on the volume and surface terms of a weak form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Integral {
    pub volume: bool,
    pub surface: bool,
}

impl Integral {
    /// A volume (interior) quadrature point.
    pub fn volume() -> Self {
        Self {
            volume: true,
            surface: false,
        }
    }

    /// A boundary quadrature point.
    pub fn surface() -> Self {
        Self {
            volume: false,
            surface: true,
        }
    }

    /// `dV`: one for volume contributions, zero otherwise.
    pub fn dv<T: Real>(&self) -> T {
        if self.volume {
            T::one()
        } else {
            T::zero()
        }
    }

    /// `dS`: one for surface contributions, zero otherwise.
    pub fn ds<T: Real>(&self) -> T {
        if self.surface {
            T::one()
        } else {
            T::zero()
        }
    }
}

/// Position, outward normal and integral selection of a quadrature point.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraturePoint<D>
where
    D: SmallDim,
    DefaultAllocator: DimAllocator<f64, D>,
{
    pub x: OPoint<f64, D>,
    /// Outward unit normal, only meaningful for surface points.
    pub normal: OVector<f64, D>,
    pub integral: Integral,
}

impl<D> QuadraturePoint<D>
where
    D: SmallDim,
    DefaultAllocator: DimAllocator<f64, D>,
{
    pub fn volume(x: OPoint<f64, D>) -> Self {
        Self {
            x,
            normal: OVector::<f64, D>::zeros(),
            integral: Integral::volume(),
        }
    }

    pub fn surface(x: OPoint<f64, D>, normal: OVector<f64, D>) -> Self {
        Self {
            x,
            normal,
            integral: Integral::surface(),
        }
    }

    pub fn normal_as<T>(&self) -> OVector<T, D>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, D>,
    {
        lift_vector(&self.normal)
    }
}

/// A weak-form residual evaluated at a single quadrature point.
///
/// `residual` adds the contribution for one set of test functions `w1` (scalar fields) and `w2`
/// (vector fields) to `r`. Implementations must be linear in the test functions, must not
/// read or write shared mutable state and have no error path: non-physical input produces
/// non-finite values.
pub trait PhysicsKernel<T, D>: Send + Sync
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    #[allow(clippy::too_many_arguments)]
    fn residual(
        &self,
        point: &QuadraturePoint<D>,
        c: &SolutionScalars<T, D>,
        u: &SolutionVectors<T, D>,
        w1: &TestScalars<T, D>,
        w2: &TestVectors<T, D>,
        ctx: &ProblemContext,
        r: &mut T,
    );
}

impl<T, D, K> PhysicsKernel<T, D> for &K
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
    K: PhysicsKernel<T, D>,
{
    fn residual(
        &self,
        point: &QuadraturePoint<D>,
        c: &SolutionScalars<T, D>,
        u: &SolutionVectors<T, D>,
        w1: &TestScalars<T, D>,
        w2: &TestVectors<T, D>,
        ctx: &ProblemContext,
        r: &mut T,
    ) {
        K::residual(self, point, c, u, w1, w2, ctx, r)
    }
}
