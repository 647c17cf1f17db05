//! Problem definitions: settings, boundary conditions, initial conditions and projections.
//!
//! A problem implements [`ProblemDefinition`]. Only [`ProblemDefinition::define_parameters`]
//! is required; every other hook has a default that leaves the solver's behavior unchanged.
use crate::allocators::DimAllocator;
use crate::boundary::{BoundaryConditionError, BoundaryConditions};
use crate::fields::{SolutionScalars, SolutionVectors};
use crate::nalgebra::{DefaultAllocator, OPoint, OVector};
use crate::parameters::{ProblemContext, ProblemSettings};
use crate::{Real, SmallDim};
use log::debug;
use rand::RngCore;

/// Derived quantities at a quadrature point, one entry per declared projection field.
#[derive(Debug, Clone, PartialEq)]
pub struct Projections<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub scalars: Vec<T>,
    pub vectors: Vec<OVector<T, D>>,
}

impl<T, D> Projections<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(scalars: Vec<T>, vectors: Vec<OVector<T, D>>) -> Self {
        Self { scalars, vectors }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Convergence information of the last nonlinear solve, passed to time step adaptation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub converged: bool,
    pub iterations: usize,
}

pub trait ProblemDefinition<D>: Send + Sync
where
    D: SmallDim,
    DefaultAllocator: DimAllocator<f64, D>,
{
    /// Discretization, time stepping, field names and default material parameters.
    fn define_parameters(&self) -> ProblemSettings;

    /// Applies the Dirichlet conditions, with prescribed values multiplied by `scale`.
    fn boundary_conditions(
        &self,
        _ctx: &ProblemContext,
        _scale: f64,
        _bcs: &mut BoundaryConditions,
    ) -> Result<(), BoundaryConditionError> {
        Ok(())
    }

    /// The load scale at the context's current time.
    fn load_scale(&self, _ctx: &ProblemContext) -> f64 {
        1.0
    }

    /// Re-applies the boundary conditions before the nonlinear solve of a step.
    ///
    /// The result depends only on the context, so repeated calls at the same time produce the
    /// same constraints.
    fn load_step(&self, ctx: &ProblemContext, bcs: &mut BoundaryConditions) -> Result<(), BoundaryConditionError> {
        let scale = self.load_scale(ctx);
        debug!("Load step {} at time {}: scale {}", ctx.step, ctx.time, scale);
        self.boundary_conditions(ctx, scale, bcs)
    }

    fn scalar_initial_condition(
        &self,
        _x: &OPoint<f64, D>,
        _field: usize,
        _ctx: &ProblemContext,
        _rng: &mut dyn RngCore,
    ) -> f64 {
        0.0
    }

    fn vector_initial_condition(
        &self,
        _x: &OPoint<f64, D>,
        _field: usize,
        _ctx: &ProblemContext,
        _rng: &mut dyn RngCore,
    ) -> OVector<f64, D> {
        OVector::<f64, D>::zeros()
    }

    /// The time step to use after a step with the given outcome.
    fn adaptive_time_step(&self, ctx: &ProblemContext, _outcome: &StepOutcome) -> f64 {
        ctx.dt
    }

    fn project_fields<T>(
        &self,
        _x: &OPoint<f64, D>,
        _c: &SolutionScalars<T, D>,
        _u: &SolutionVectors<T, D>,
        _ctx: &ProblemContext,
    ) -> Projections<T, D>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, D>,
    {
        Projections::empty()
    }
}
