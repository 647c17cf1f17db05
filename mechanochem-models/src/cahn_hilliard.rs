//! Coupled Cahn-Hilliard/Allen-Cahn phase separation.
//!
//! The concentration $c$ follows a fourth-order Cahn-Hilliard equation whose boundary terms
//! are imposed weakly with Nitsche's method, and the order parameter $\eta$ follows an
//! Allen-Cahn equation. Both are driven by a [`ChemicalFreeEnergy`].
use crate::free_energy::{ChemicalFreeEnergy, CoupledMultiWell};
use eyre::WrapErr;
use log::debug;
use mechanochem::allocators::DimAllocator;
use mechanochem::fields::{SolutionScalars, SolutionVectors, TestScalars, TestVectors};
use mechanochem::kernel::{PhysicsKernel, QuadraturePoint};
use mechanochem::nalgebra::{DefaultAllocator, OPoint, U2};
use mechanochem::parameters::{MaterialParameters, ProblemContext, ProblemSettings};
use mechanochem::problem::ProblemDefinition;
use mechanochem::{Real, SmallDim};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CahnHilliardParameters {
    /// Cahn-Hilliard mobility $M$.
    pub mobility: f64,
    /// Allen-Cahn kinetic coefficient $L$.
    pub kinetic_coeff: f64,
    /// Gradient energy coefficient $\kappa$, shared by both equations.
    pub kappa: f64,
    /// Prescribed normal concentration flux $j_n$ on the boundary.
    pub influx: f64,
}

impl Default for CahnHilliardParameters {
    fn default() -> Self {
        Self {
            mobility: 0.1,
            kinetic_coeff: 2.0,
            kappa: 0.0005,
            influx: 0.0,
        }
    }
}

impl CahnHilliardParameters {
    pub fn from_material(material: &MaterialParameters) -> eyre::Result<Self> {
        Ok(Self {
            mobility: material.get("mobility")?,
            kinetic_coeff: material.get("kinetic_coeff")?,
            kappa: material.get("kappa")?,
            influx: material.get_or("influx", 0.0),
        })
    }

    pub fn to_material(&self) -> MaterialParameters {
        MaterialParameters::new()
            .with("mobility", self.mobility)
            .with("kinetic_coeff", self.kinetic_coeff)
            .with("kappa", self.kappa)
            .with("influx", self.influx)
    }
}

/// The weak form of the coupled Cahn-Hilliard/Allen-Cahn system.
///
/// Scalar field 0 is the concentration $c$ and scalar field 1 the order parameter $\eta$.
/// Per test function pair $(w_c, w_\eta)$ the contribution is
/// $$
/// \begin{aligned}
/// r ={}& \left[ w_c \frac{c - c_{n-1}}{\Delta t}
///     + M \nabla w_c \cdot (F_{,cc} \nabla c + F_{,c\eta} \nabla \eta)
///     + M \kappa \Delta w_c \Delta c \right] \mathrm{d}V \\\\
///   & - \left[ w_c j_n
///     + M \kappa \left( \Delta c \, \nabla w_c \cdot \vec n + \Delta w_c \, \nabla c \cdot \vec n \right)
///     - \tau (\nabla w_c \cdot \vec n)(\nabla c \cdot \vec n) \right] \mathrm{d}S \\\\
///   & + \left[ w_\eta \frac{\eta - \eta_{n-1}}{\Delta t}
///     + L \left( w_\eta F_{,\eta} + \kappa \nabla w_\eta \cdot \nabla \eta \right) \right] \mathrm{d}V,
/// \end{aligned}
/// $$
/// with the Nitsche penalty $\tau = 0.1 N_0 / L_0$ taken from the element count and length of
/// the first axis.
#[derive(Clone, Debug, PartialEq)]
pub struct CahnHilliardAllenCahn<E = CoupledMultiWell> {
    parameters: CahnHilliardParameters,
    free_energy: E,
}

impl CahnHilliardAllenCahn<CoupledMultiWell> {
    pub fn new(parameters: CahnHilliardParameters) -> Self {
        Self::with_free_energy(parameters, CoupledMultiWell)
    }

    /// Reads the parameters from the material parameters of the context.
    pub fn from_context(ctx: &ProblemContext) -> eyre::Result<Self> {
        let parameters = CahnHilliardParameters::from_material(ctx.material())
            .wrap_err("incomplete Cahn-Hilliard/Allen-Cahn material parameters")?;
        debug!("Cahn-Hilliard/Allen-Cahn parameters: {:?}", parameters);
        Ok(Self::new(parameters))
    }
}

impl<E> CahnHilliardAllenCahn<E> {
    pub fn with_free_energy(parameters: CahnHilliardParameters, free_energy: E) -> Self {
        Self {
            parameters,
            free_energy,
        }
    }

    pub fn parameters(&self) -> &CahnHilliardParameters {
        &self.parameters
    }

    pub fn free_energy(&self) -> &E {
        &self.free_energy
    }
}

#[allow(non_snake_case)]
impl<T, D, E> PhysicsKernel<T, D> for CahnHilliardAllenCahn<E>
where
    T: Real,
    D: SmallDim,
    E: ChemicalFreeEnergy<T>,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn residual(
        &self,
        point: &QuadraturePoint<D>,
        c: &SolutionScalars<T, D>,
        _u: &SolutionVectors<T, D>,
        w1: &TestScalars<T, D>,
        _w2: &TestVectors<T, D>,
        ctx: &ProblemContext,
        r: &mut T,
    ) {
        let dV: T = point.integral.dv();
        let dS: T = point.integral.ds();
        let normal = point.normal_as::<T>();

        let dt = T::from(ctx.dt);
        let jn = T::from(self.parameters.influx);
        let M = T::from(self.parameters.mobility);
        let L = T::from(self.parameters.kinetic_coeff);
        let kappa = T::from(self.parameters.kappa);
        let tau = T::from(0.1 * ctx.settings.num_elements[0] as f64 / ctx.settings.lengths[0]);

        let f_cc = self.free_energy.f_cc(c.val(0), c.val(1));
        let f_ceta = self.free_energy.f_ceta(c.val(0), c.val(1));
        let f_eta = self.free_energy.f_eta(c.val(0), c.val(1));

        // Cahn-Hilliard
        *r += w1.val(0) * (c.val(0) - c.val_prev(0)) / dt * dV;
        *r += M * w1.grad(0).dot(&(c.grad(0) * f_cc + c.grad(1) * f_ceta)) * dV;
        *r += M * kappa * w1.laplacian(0) * c.laplacian(0) * dV;

        *r += -w1.val(0) * jn * dS;
        *r += -M
            * kappa
            * (c.laplacian(0) * w1.grad(0).dot(&normal) + w1.laplacian(0) * c.grad(0).dot(&normal))
            * dS;
        *r += tau * w1.grad(0).dot(&normal) * c.grad(0).dot(&normal) * dS;

        // Allen-Cahn
        *r += w1.val(1) * (c.val(1) - c.val_prev(1)) / dt * dV;
        *r += L * (w1.val(1) * f_eta + kappa * w1.grad(1).dot(c.grad(1))) * dV;
    }
}

/// Spinodal decomposition on the periodic unit square, starting from small random
/// perturbations around $c = \eta = 0.5$.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CahnHilliardProblem;

impl CahnHilliardProblem {
    /// The kernel for the material parameters of `ctx`.
    pub fn kernel(&self, ctx: &ProblemContext) -> eyre::Result<CahnHilliardAllenCahn> {
        CahnHilliardAllenCahn::from_context(ctx)
    }
}

impl ProblemDefinition<U2> for CahnHilliardProblem {
    fn define_parameters(&self) -> ProblemSettings {
        ProblemSettings {
            dim: 2,
            num_elements: vec![20, 20],
            lengths: vec![1.0, 1.0],
            periodic: vec![true, true],
            poly_order: 2,
            global_continuity: 1,
            dt: 0.1,
            total_time: 20.0,
            restart_iteration: 0,
            restart_time: 0.0,
            skip_output: 2,
            scalar_solution_fields: vec!["c".to_string(), "eta".to_string()],
            material: CahnHilliardParameters::default().to_material(),
            ..ProblemSettings::default()
        }
    }

    fn scalar_initial_condition(
        &self,
        _x: &OPoint<f64, U2>,
        field: usize,
        _ctx: &ProblemContext,
        rng: &mut dyn RngCore,
    ) -> f64 {
        let amplitude = match field {
            0 => 0.01,
            1 => 0.03,
            _ => return 0.0,
        };
        let r = rng.gen_range(0..100u32) as f64 / 100.0;
        0.5 + amplitude * (0.5 - r)
    }
}
