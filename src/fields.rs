//! Field snapshots at a single quadrature point.
//!
//! Scalar fields carry value, gradient and Hessian; vector fields carry value, gradient
//! $\nabla \vec u$ with entries $\partial u_i / \partial X_j$ and one Hessian per component.
//! Solution snapshots additionally carry the values of the previous time step. All snapshots
//! are built fresh for every kernel call and never mutated by a kernel.
use crate::allocators::DimAllocator;
use crate::nalgebra::{DefaultAllocator, OMatrix, OVector, Scalar};
use crate::{Real, SmallDim};

/// Value, gradient and Hessian of a scalar quantity at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarValues<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub value: T,
    pub gradient: OVector<T, D>,
    pub hessian: OMatrix<T, D, D>,
}

impl<T, D> ScalarValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(value: T, gradient: OVector<T, D>, hessian: OMatrix<T, D, D>) -> Self {
        Self {
            value,
            gradient,
            hessian,
        }
    }

    pub fn zeros() -> Self {
        Self {
            value: T::zero(),
            gradient: OVector::<T, D>::zeros(),
            hessian: OMatrix::<T, D, D>::zeros(),
        }
    }

    /// The Laplacian, i.e. the trace of the Hessian.
    pub fn laplacian(&self) -> T {
        self.hessian.trace()
    }

    pub fn scaled(&self, factor: T) -> Self {
        Self {
            value: self.value * factor,
            gradient: &self.gradient * factor,
            hessian: &self.hessian * factor,
        }
    }
}

/// Value, gradient and per-component Hessians of a vector quantity at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorValues<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub value: OVector<T, D>,
    /// Entry `(i, j)` holds $\partial u_i / \partial X_j$.
    pub gradient: OMatrix<T, D, D>,
    /// Entry `k` holds the Hessian of component $u_k$.
    pub hessian: Vec<OMatrix<T, D, D>>,
}

impl<T, D> VectorValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Constructs vector values.
    ///
    /// # Panics
    ///
    /// Panics if the number of component Hessians differs from the spatial dimension.
    pub fn new(value: OVector<T, D>, gradient: OMatrix<T, D, D>, hessian: Vec<OMatrix<T, D, D>>) -> Self {
        assert_eq!(hessian.len(), D::dim(), "Need exactly one Hessian per vector component");
        Self {
            value,
            gradient,
            hessian,
        }
    }

    pub fn zeros() -> Self {
        Self {
            value: OVector::<T, D>::zeros(),
            gradient: OMatrix::<T, D, D>::zeros(),
            hessian: vec![OMatrix::<T, D, D>::zeros(); D::dim()],
        }
    }

    /// The third-order tensor $\nabla \nabla \vec u$ evaluated at `(i, j, k)`, i.e.
    /// $\partial^2 u_i / \partial X_j \partial X_k$.
    pub fn second_gradient(&self, i: usize, j: usize, k: usize) -> T {
        self.hessian[i][(j, k)]
    }

    pub fn scaled(&self, factor: T) -> Self {
        Self {
            value: &self.value * factor,
            gradient: &self.gradient * factor,
            hessian: self.hessian.iter().map(|h| h * factor).collect(),
        }
    }
}

/// Current and previous-step snapshots of every scalar solution field.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionScalars<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    current: Vec<ScalarValues<T, D>>,
    previous: Vec<ScalarValues<T, D>>,
}

impl<T, D> SolutionScalars<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// # Panics
    ///
    /// Panics if `current` and `previous` hold a different number of fields.
    pub fn new(current: Vec<ScalarValues<T, D>>, previous: Vec<ScalarValues<T, D>>) -> Self {
        assert_eq!(
            current.len(),
            previous.len(),
            "Current and previous snapshots must have the same number of fields"
        );
        Self { current, previous }
    }

    /// A snapshot without any scalar fields.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn num_fields(&self) -> usize {
        self.current.len()
    }

    pub fn current(&self, field: usize) -> &ScalarValues<T, D> {
        &self.current[field]
    }

    pub fn previous(&self, field: usize) -> &ScalarValues<T, D> {
        &self.previous[field]
    }

    pub fn val(&self, field: usize) -> T {
        self.current[field].value
    }

    pub fn grad(&self, field: usize) -> &OVector<T, D> {
        &self.current[field].gradient
    }

    pub fn hess(&self, field: usize) -> &OMatrix<T, D, D> {
        &self.current[field].hessian
    }

    pub fn laplacian(&self, field: usize) -> T {
        self.current[field].laplacian()
    }

    pub fn val_prev(&self, field: usize) -> T {
        self.previous[field].value
    }
}

/// Current and previous-step snapshots of every vector solution field.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionVectors<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    current: Vec<VectorValues<T, D>>,
    previous: Vec<VectorValues<T, D>>,
}

impl<T, D> SolutionVectors<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// # Panics
    ///
    /// Panics if `current` and `previous` hold a different number of fields.
    pub fn new(current: Vec<VectorValues<T, D>>, previous: Vec<VectorValues<T, D>>) -> Self {
        assert_eq!(
            current.len(),
            previous.len(),
            "Current and previous snapshots must have the same number of fields"
        );
        Self { current, previous }
    }

    /// A snapshot without any vector fields.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn num_fields(&self) -> usize {
        self.current.len()
    }

    pub fn current(&self, field: usize) -> &VectorValues<T, D> {
        &self.current[field]
    }

    pub fn previous(&self, field: usize) -> &VectorValues<T, D> {
        &self.previous[field]
    }

    pub fn val(&self, field: usize) -> &OVector<T, D> {
        &self.current[field].value
    }

    pub fn grad(&self, field: usize) -> &OMatrix<T, D, D> {
        &self.current[field].gradient
    }

    pub fn hess(&self, field: usize) -> &[OMatrix<T, D, D>] {
        &self.current[field].hessian
    }
}

/// Test function values for every scalar solution field.
#[derive(Debug, Clone, PartialEq)]
pub struct TestScalars<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fields: Vec<ScalarValues<T, D>>,
}

impl<T, D> TestScalars<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(fields: Vec<ScalarValues<T, D>>) -> Self {
        Self { fields }
    }

    /// Vanishing test functions for `num_fields` fields.
    pub fn zeros(num_fields: usize) -> Self {
        Self::new(vec![ScalarValues::zeros(); num_fields])
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, field: usize) -> &ScalarValues<T, D> {
        &self.fields[field]
    }

    pub fn field_mut(&mut self, field: usize) -> &mut ScalarValues<T, D> {
        &mut self.fields[field]
    }

    pub fn val(&self, field: usize) -> T {
        self.fields[field].value
    }

    pub fn grad(&self, field: usize) -> &OVector<T, D> {
        &self.fields[field].gradient
    }

    pub fn hess(&self, field: usize) -> &OMatrix<T, D, D> {
        &self.fields[field].hessian
    }

    pub fn laplacian(&self, field: usize) -> T {
        self.fields[field].laplacian()
    }

    pub fn scaled(&self, factor: T) -> Self {
        Self::new(self.fields.iter().map(|w| w.scaled(factor)).collect())
    }
}

/// Test function values for every vector solution field.
#[derive(Debug, Clone, PartialEq)]
pub struct TestVectors<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fields: Vec<VectorValues<T, D>>,
}

impl<T, D> TestVectors<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(fields: Vec<VectorValues<T, D>>) -> Self {
        Self { fields }
    }

    /// Vanishing test functions for `num_fields` fields.
    pub fn zeros(num_fields: usize) -> Self {
        Self::new(vec![VectorValues::zeros(); num_fields])
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, field: usize) -> &VectorValues<T, D> {
        &self.fields[field]
    }

    pub fn field_mut(&mut self, field: usize) -> &mut VectorValues<T, D> {
        &mut self.fields[field]
    }

    pub fn val(&self, field: usize) -> &OVector<T, D> {
        &self.fields[field].value
    }

    pub fn grad(&self, field: usize) -> &OMatrix<T, D, D> {
        &self.fields[field].gradient
    }

    pub fn hess(&self, field: usize) -> &[OMatrix<T, D, D>] {
        &self.fields[field].hessian
    }

    pub fn scaled(&self, factor: T) -> Self {
        Self::new(self.fields.iter().map(|w| w.scaled(factor)).collect())
    }
}
