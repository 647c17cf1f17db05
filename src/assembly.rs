//! Evaluation of a physics kernel at single quadrature points.
//!
//! The [`PointAssembler`] interpolates the local field snapshots from basis function values and
//! coefficients, calls the kernel once per test function and collects the results. The local
//! coefficient vector is interleaved per basis function: for basis function `a`, the scalar
//! fields come first, followed by the components of every vector field (see [`FieldLayout`]).
//!
//! Jacobians are computed by forward-mode automatic differentiation, seeding one `Dual64`
//! direction per coefficient.
use crate::allocators::DimAllocator;
use crate::fields::{ScalarValues, SolutionScalars, SolutionVectors, TestScalars, TestVectors, VectorValues};
use crate::kernel::{PhysicsKernel, QuadraturePoint};
use crate::nalgebra::{DMatrix, DVector, DefaultAllocator, OMatrix, OPoint, OVector};
use crate::parameters::{ProblemContext, ProblemSettings};
use crate::problem::{ProblemDefinition, Projections};
use crate::tensor::{lift_matrix, lift_vector};
use crate::{Real, SmallDim};
use eyre::eyre;
use itertools::izip;
use log::debug;
use num_dual::Dual64;
use rayon::prelude::*;

/// Value, gradient and Hessian of one basis function at a quadrature point.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisValues<D>
where
    D: SmallDim,
    DefaultAllocator: DimAllocator<f64, D>,
{
    pub value: f64,
    pub gradient: OVector<f64, D>,
    pub hessian: OMatrix<f64, D, D>,
}

impl<D> BasisValues<D>
where
    D: SmallDim,
    DefaultAllocator: DimAllocator<f64, D>,
{
    pub fn new(value: f64, gradient: OVector<f64, D>, hessian: OMatrix<f64, D, D>) -> Self {
        Self {
            value,
            gradient,
            hessian,
        }
    }
}

/// The number of scalar and vector fields sharing each basis function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub num_scalar_fields: usize,
    pub num_vector_fields: usize,
    pub dim: usize,
}

impl FieldLayout {
    pub fn new(num_scalar_fields: usize, num_vector_fields: usize, dim: usize) -> Self {
        Self {
            num_scalar_fields,
            num_vector_fields,
            dim,
        }
    }

    pub fn from_settings(settings: &ProblemSettings) -> Self {
        Self::new(
            settings.scalar_solution_fields.len(),
            settings.vector_solution_fields.len(),
            settings.dim,
        )
    }

    pub fn dofs_per_basis(&self) -> usize {
        self.num_scalar_fields + self.dim * self.num_vector_fields
    }

    /// Local dof index of a scalar field.
    pub fn scalar_dof(&self, field: usize) -> usize {
        field
    }

    /// Local dof index of one component of a vector field.
    pub fn vector_dof(&self, field: usize, component: usize) -> usize {
        self.num_scalar_fields + field * self.dim + component
    }
}

/// A quadrature point together with its weight and the local basis functions supported there.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData<D>
where
    D: SmallDim,
    DefaultAllocator: DimAllocator<f64, D>,
{
    pub point: QuadraturePoint<D>,
    pub weight: f64,
    pub basis: Vec<BasisValues<D>>,
}

fn interpolate<T, D>(
    layout: &FieldLayout,
    basis: &[BasisValues<D>],
    coefficients: &[T],
) -> (Vec<ScalarValues<T, D>>, Vec<VectorValues<T, D>>)
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let mut scalars = vec![ScalarValues::zeros(); layout.num_scalar_fields];
    let mut vectors = vec![VectorValues::zeros(); layout.num_vector_fields];

    for (phi, coeffs) in izip!(basis, coefficients.chunks(layout.dofs_per_basis())) {
        let n = T::from(phi.value);
        let grad_n: OVector<T, D> = lift_vector(&phi.gradient);
        let hess_n: OMatrix<T, D, D> = lift_matrix(&phi.hessian);

        for (s, scalar) in scalars.iter_mut().enumerate() {
            let coeff = coeffs[layout.scalar_dof(s)];
            scalar.value += n * coeff;
            scalar.gradient += &grad_n * coeff;
            scalar.hessian += &hess_n * coeff;
        }

        for (v, vector) in vectors.iter_mut().enumerate() {
            for i in 0..D::dim() {
                let coeff = coeffs[layout.vector_dof(v, i)];
                vector.value[i] += n * coeff;
                for j in 0..D::dim() {
                    vector.gradient[(i, j)] += grad_n[j] * coeff;
                }
                vector.hessian[i] += &hess_n * coeff;
            }
        }
    }

    (scalars, vectors)
}

/// The test functions of a single local dof: basis function `phi` on dof `dof`, zero elsewhere.
fn test_functions<T, D>(
    layout: &FieldLayout,
    phi: &BasisValues<D>,
    dof: usize,
) -> (TestScalars<T, D>, TestVectors<T, D>)
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let mut w1 = TestScalars::zeros(layout.num_scalar_fields);
    let mut w2 = TestVectors::zeros(layout.num_vector_fields);
    let n = T::from(phi.value);
    let grad_n: OVector<T, D> = lift_vector(&phi.gradient);
    let hess_n: OMatrix<T, D, D> = lift_matrix(&phi.hessian);

    if dof < layout.num_scalar_fields {
        *w1.field_mut(dof) = ScalarValues::new(n, grad_n, hess_n);
    } else {
        let field = (dof - layout.num_scalar_fields) / layout.dim;
        let component = (dof - layout.num_scalar_fields) % layout.dim;
        let w = w2.field_mut(field);
        w.value[component] = n;
        w.gradient.set_row(component, &grad_n.transpose());
        w.hessian[component] = hess_n;
    }

    (w1, w2)
}

/// Evaluates a kernel for all test functions supported at a quadrature point.
#[derive(Debug)]
pub struct PointAssembler<'a, K> {
    kernel: &'a K,
    layout: FieldLayout,
    ctx: &'a ProblemContext,
}

impl<'a, K> PointAssembler<'a, K> {
    pub fn new(kernel: &'a K, layout: FieldLayout, ctx: &'a ProblemContext) -> Self {
        Self { kernel, layout, ctx }
    }

    /// An assembler whose layout follows the solution fields declared in the context's settings.
    pub fn from_context(kernel: &'a K, ctx: &'a ProblemContext) -> Self {
        Self::new(kernel, FieldLayout::from_settings(&ctx.settings), ctx)
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn context(&self) -> &ProblemContext {
        self.ctx
    }

    fn check_shapes<D>(
        &self,
        num_basis: usize,
        coefficients: &DVector<f64>,
        previous: &DVector<f64>,
    ) -> eyre::Result<()>
    where
        D: SmallDim,
    {
        if self.layout.dim != D::dim() {
            return Err(eyre!(
                "field layout is {}-dimensional but the kernel is evaluated in {} dimensions",
                self.layout.dim,
                D::dim()
            ));
        }
        let ndof = self.layout.dofs_per_basis();
        if ndof == 0 {
            return Err(eyre!("field layout declares no solution fields"));
        }
        let expected = num_basis * ndof;
        if coefficients.len() != expected || previous.len() != expected {
            return Err(eyre!(
                "expected {} local coefficients ({} basis functions x {} dofs), got {} current and {} previous",
                expected,
                num_basis,
                ndof,
                coefficients.len(),
                previous.len()
            ));
        }
        Ok(())
    }

    fn snapshot<T, D>(
        &self,
        basis: &[BasisValues<D>],
        coefficients: &[T],
        previous: &[f64],
    ) -> (SolutionScalars<T, D>, SolutionVectors<T, D>)
    where
        T: Real,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let previous: Vec<T> = previous.iter().map(|&x| T::from(x)).collect();
        let (c_current, u_current) = interpolate(&self.layout, basis, coefficients);
        let (c_previous, u_previous) = interpolate(&self.layout, basis, &previous);
        (
            SolutionScalars::new(c_current, c_previous),
            SolutionVectors::new(u_current, u_previous),
        )
    }

    /// Unweighted kernel values for every local (basis function, dof) pair.
    fn residual_entries<T, D>(
        &self,
        point: &QuadraturePoint<D>,
        basis: &[BasisValues<D>],
        coefficients: &[T],
        previous: &[f64],
    ) -> Vec<T>
    where
        T: Real,
        D: SmallDim,
        K: PhysicsKernel<T, D>,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let (c, u) = self.snapshot(basis, coefficients, previous);
        let ndof = self.layout.dofs_per_basis();
        let mut entries = Vec::with_capacity(basis.len() * ndof);
        for phi in basis {
            for dof in 0..ndof {
                let (w1, w2) = test_functions(&self.layout, phi, dof);
                let mut r = T::zero();
                self.kernel.residual(point, &c, &u, &w1, &w2, self.ctx, &mut r);
                entries.push(r);
            }
        }
        entries
    }

    /// The local residual at one quadrature point, scaled by the quadrature weight.
    ///
    /// Entry `a * n_dof + k` holds the contribution of the test function of basis function `a`
    /// on local dof `k`.
    pub fn assemble_point_residual<D>(
        &self,
        point: &QuadraturePoint<D>,
        weight: f64,
        basis: &[BasisValues<D>],
        coefficients: &DVector<f64>,
        previous: &DVector<f64>,
    ) -> eyre::Result<DVector<f64>>
    where
        D: SmallDim,
        K: PhysicsKernel<f64, D>,
        DefaultAllocator: DimAllocator<f64, D>,
    {
        self.check_shapes::<D>(basis.len(), coefficients, previous)?;
        let entries = self.residual_entries(point, basis, coefficients.as_slice(), previous.as_slice());
        Ok(DVector::from_vec(entries) * weight)
    }

    /// The derivative of [`assemble_point_residual`](Self::assemble_point_residual) with respect
    /// to the current local coefficients.
    pub fn assemble_point_jacobian<D>(
        &self,
        point: &QuadraturePoint<D>,
        weight: f64,
        basis: &[BasisValues<D>],
        coefficients: &DVector<f64>,
        previous: &DVector<f64>,
    ) -> eyre::Result<DMatrix<f64>>
    where
        D: SmallDim,
        K: PhysicsKernel<Dual64, D>,
        DefaultAllocator: DimAllocator<Dual64, D>,
    {
        self.check_shapes::<D>(basis.len(), coefficients, previous)?;
        let n = coefficients.len();
        let mut jacobian = DMatrix::zeros(n, n);
        for j in 0..n {
            let seeded: Vec<Dual64> = coefficients
                .iter()
                .enumerate()
                .map(|(i, &x)| if i == j { Dual64::new(x, 1.0) } else { Dual64::from(x) })
                .collect();
            let entries = self.residual_entries(point, basis, &seeded, previous.as_slice());
            for (i, r_i) in entries.iter().enumerate() {
                jacobian[(i, j)] = weight * r_i.eps;
            }
        }
        Ok(jacobian)
    }

    /// Sums the weighted residuals of many quadrature points sharing the same local basis.
    ///
    /// Points are evaluated in parallel. Since the contributions are summed in an unspecified
    /// order, the result may differ from a sequential sum by round-off.
    pub fn assemble_points_residual<D>(
        &self,
        points: &[PointData<D>],
        coefficients: &DVector<f64>,
        previous: &DVector<f64>,
    ) -> eyre::Result<DVector<f64>>
    where
        D: SmallDim,
        K: PhysicsKernel<f64, D>,
        PointData<D>: Sync,
        DefaultAllocator: DimAllocator<f64, D>,
    {
        debug!("Assembling residual over {} quadrature points", points.len());
        let n = coefficients.len();
        points
            .par_iter()
            .map(|p| self.assemble_point_residual(&p.point, p.weight, &p.basis, coefficients, previous))
            .try_reduce(|| DVector::zeros(n), |a, b| Ok(a + b))
    }

    /// Evaluates the projection fields of `problem` at one point.
    pub fn project_point_fields<P, D>(
        &self,
        problem: &P,
        x: &OPoint<f64, D>,
        basis: &[BasisValues<D>],
        coefficients: &DVector<f64>,
        previous: &DVector<f64>,
    ) -> eyre::Result<Projections<f64, D>>
    where
        P: ProblemDefinition<D>,
        D: SmallDim,
        DefaultAllocator: DimAllocator<f64, D>,
    {
        self.check_shapes::<D>(basis.len(), coefficients, previous)?;
        let (c, u) = self.snapshot(basis, coefficients.as_slice(), previous.as_slice());
        Ok(problem.project_fields(x, &c, &u, self.ctx))
    }
}
