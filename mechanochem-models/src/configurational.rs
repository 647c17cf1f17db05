//! Configurational forces in a finite-deformation body with an evolving material configuration.
//!
//! Two displacement fields are solved for. The configurational displacement $\vec u^0$ (vector
//! field 0) defines the configurational deformation gradient $\vec \chi = \vec I + \nabla \vec u^0$,
//! and the total displacement $\vec u^1$ (vector field 1) defines
//! $\vec F^\mathrm{tot} = \vec I + \nabla \vec u^1$. The elastic deformation gradient is
//! $\vec F = \vec F^\mathrm{tot} \vec \chi^{-1}$.
//!
//! The stored energy per reference volume is $\psi^\mathrm{M}(\vec \chi, \nabla \vec \chi)
//! + J_\chi \psi^\mathrm{S}(\vec F, \vec \chi)$:
//!
//! - $\psi^\mathrm{S}$ is an anisotropic St. Venant-Kirchhoff energy whose axial stiffness
//!   $\alpha_I = \alpha \Lambda_I$ depends on the configurational stretch
//!   $\Lambda_I = |\vec \chi \vec e_I|$,
//! - $\psi^\mathrm{M}$ is a nonconvex multi-well energy of the configurational strain
//!   $\vec \Theta = \frac{1}{2}(\vec \chi^T \vec \chi - \vec I)$, regularized by a gradient term.
//!
//! Division by $\Lambda_I$ is not guarded: a configurational deformation gradient with a
//! vanishing column produces non-finite stresses.
use eyre::WrapErr;
use log::debug;
use mechanochem::allocators::DimAllocator;
use mechanochem::boundary::{BoundaryConditionError, BoundaryConditions};
use mechanochem::fields::{SolutionScalars, SolutionVectors, TestScalars, TestVectors, VectorValues};
use mechanochem::kernel::{PhysicsKernel, QuadraturePoint};
use mechanochem::nalgebra::{DefaultAllocator, Matrix2, OMatrix, OPoint, Scalar, Vector2, U2};
use mechanochem::parameters::{MaterialParameters, ProblemContext, ProblemSettings};
use mechanochem::problem::{ProblemDefinition, Projections};
use mechanochem::tensor::{determinant, inverse};
use mechanochem::{Real, SmallDim};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationalParameters {
    /// Shear modulus $\mu$ of the standard energy.
    pub mu: f64,
    /// Lamé-like modulus $\beta$ of the standard energy.
    pub beta: f64,
    /// Axial stiffness per unit configurational stretch.
    pub alpha: f64,
    /// Energy scale $d$ of the configurational energy.
    #[serde(rename = "Es")]
    pub es: f64,
    /// Strain $s$ at the wells of the configurational energy.
    pub s: f64,
    /// Gradient length scale $l$.
    pub l: f64,
}

impl Default for ConfigurationalParameters {
    fn default() -> Self {
        // alpha = beta + 2 mu is isotropic in the reference configuration
        Self {
            mu: 1.0,
            beta: 1.0,
            alpha: 3.0,
            es: 1.0,
            s: 0.1,
            l: 0.05,
        }
    }
}

impl ConfigurationalParameters {
    pub fn from_material(material: &MaterialParameters) -> eyre::Result<Self> {
        Ok(Self {
            mu: material.get("mu")?,
            beta: material.get("beta")?,
            alpha: material.get("alpha")?,
            es: material.get("Es")?,
            s: material.get("s")?,
            l: material.get("l")?,
        })
    }

    pub fn to_material(&self) -> MaterialParameters {
        MaterialParameters::new()
            .with("mu", self.mu)
            .with("beta", self.beta)
            .with("alpha", self.alpha)
            .with("Es", self.es)
            .with("s", self.s)
            .with("l", self.l)
    }
}

/// Kinematics and stresses of the standard (elastic) energy.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardState<T, D>
where
    T: Scalar,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub chi: OMatrix<T, D, D>,
    pub chi_inv: OMatrix<T, D, D>,
    /// $J_\chi = \det \vec \chi$.
    pub j_chi: T,
    /// The elastic deformation gradient $\vec F = \vec F^\mathrm{tot} \vec \chi^{-1}$.
    pub deformation_gradient: OMatrix<T, D, D>,
    pub green_strain: OMatrix<T, D, D>,
    pub second_piola_stress: OMatrix<T, D, D>,
    pub first_piola_stress: OMatrix<T, D, D>,
    /// $\vec{\mathcal{E}} = \psi^\mathrm{S} \vec I - \vec F^T \vec P$.
    pub eshelby_stress: OMatrix<T, D, D>,
    /// $\psi^\mathrm{S}$ per unit intermediate volume.
    pub energy_density: T,
    /// The explicit derivative $\partial \psi^\mathrm{S} / \partial \vec \chi$ at fixed $\vec F$.
    pub energy_chi_derivative: OMatrix<T, D, D>,
}

/// Strain measures, energy and energy derivatives of the configurational energy in 2D.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationalState<T>
where
    T: Scalar,
{
    pub theta: Matrix2<T>,
    pub eta1: T,
    pub eta2: T,
    pub eta6: T,
    pub grad_eta2: Vector2<T>,
    pub energy_density: T,
    /// $\vec D = \partial \psi^\mathrm{M} / \partial \vec \chi$.
    pub d: Matrix2<T>,
    /// $\vec B = \partial \psi^\mathrm{M} / \partial \nabla \vec \chi$. Entry `i` holds
    /// $B_{iJK}$ at `(J, K)`.
    pub b: [Matrix2<T>; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstitutiveState<T>
where
    T: Scalar,
{
    pub standard: StandardState<T, U2>,
    pub configurational: ConfigurationalState<T>,
}

impl<T: Real> ConstitutiveState<T> {
    /// The total stored energy $\psi^\mathrm{M} + J_\chi \psi^\mathrm{S}$ per reference volume.
    pub fn stored_energy(&self) -> T {
        self.configurational.energy_density + self.standard.j_chi * self.standard.energy_density
    }
}

fn stretch<T, D>(chi: &OMatrix<T, D, D>, axis: usize) -> T
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    chi.column(axis)
        .iter()
        .fold(T::zero(), |sum, &chi_i| sum + chi_i * chi_i)
        .sqrt()
}

/// $\eta_2 = \Theta_{00} - \Theta_{11} = \frac{1}{2}(\Lambda_0^2 - \Lambda_1^2)$ for the
/// configurational displacement gradient.
#[replace_float_literals(T::from(literal))]
pub fn eta2<T>(grad_u_conf: &OMatrix<T, U2, U2>) -> T
where
    T: Real,
    DefaultAllocator: DimAllocator<T, U2>,
{
    let chi = OMatrix::<T, U2, U2>::identity() + grad_u_conf;
    let squared_stretch = |axis: usize| chi.column(axis).dot(&chi.column(axis));
    0.5 * (squared_stretch(0) - squared_stretch(1))
}

/// The constitutive model coupling the standard and configurational energies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationalModel;

#[allow(non_snake_case)]
impl ConfigurationalModel {
    /// Evaluates the anisotropic St. Venant-Kirchhoff energy
    /// $$
    /// \psi^\mathrm{S} = \frac{1}{2} \left[ \beta \operatorname{tr}(\vec E)^2 + 2 \mu \vec E : \vec E
    ///     + \sum_I E_{II}^2 (\alpha_I - \beta - 2\mu) \right]
    /// $$
    /// and its stresses, with $\vec E = \frac{1}{2}(\vec F^T \vec F - \vec I)$.
    #[replace_float_literals(T::from(literal))]
    pub fn standard_state<T, D>(
        &self,
        chi: &OMatrix<T, D, D>,
        total_deformation_gradient: &OMatrix<T, D, D>,
        parameters: &ConfigurationalParameters,
    ) -> StandardState<T, D>
    where
        T: Real,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let mu = T::from(parameters.mu);
        let beta = T::from(parameters.beta);
        let alpha = T::from(parameters.alpha);
        let I = OMatrix::<T, D, D>::identity();

        let chi_inv = inverse(chi);
        let j_chi = determinant(chi);
        let F = total_deformation_gradient * &chi_inv;
        let E = (F.transpose() * &F - &I) * 0.5;

        let mut S = &I * (beta * E.trace()) + &E * (2.0 * mu);
        let mut dpsi_dchi = OMatrix::<T, D, D>::zeros();
        for J in 0..D::dim() {
            let Lambda_J = stretch(chi, J);
            let alpha_J = alpha * Lambda_J;
            S[(J, J)] += E[(J, J)] * (alpha_J - beta - 2.0 * mu);
            for i in 0..D::dim() {
                dpsi_dchi[(i, J)] = 0.5 * alpha / Lambda_J * chi[(i, J)] * E[(J, J)].powi(2);
            }
        }

        let psi = 0.5 * E.dot(&S);
        let P = &F * &S;
        let eshelby = &I * psi - F.transpose() * &P;

        StandardState {
            chi: chi.clone(),
            chi_inv,
            j_chi,
            deformation_gradient: F,
            green_strain: E,
            second_piola_stress: S,
            first_piola_stress: P,
            eshelby_stress: eshelby,
            energy_density: psi,
            energy_chi_derivative: dpsi_dchi,
        }
    }

    /// Evaluates the configurational energy
    /// $$
    /// \psi^\mathrm{M} = \frac{d}{s^2} (\eta_1^2 + \eta_6^2) - \frac{2d}{s^2} \eta_2^2
    ///     + \frac{d}{s^4} \eta_2^4 + \frac{l^2 d}{s^2} |\nabla \eta_2|^2
    /// $$
    /// with $\eta_1 = \Theta_{00} + \Theta_{11}$, $\eta_2 = \Theta_{00} - \Theta_{11}$ and
    /// $\eta_6 = \Theta_{01}$, together with its derivatives $\vec D$ and $\vec B$.
    ///
    /// `chi_gradient[i]` holds $\chi_{iJ,K}$ at `(J, K)`, i.e. the Hessian of component `i` of
    /// the configurational displacement.
    #[replace_float_literals(T::from(literal))]
    pub fn configurational_state<T: Real>(
        &self,
        chi: &Matrix2<T>,
        chi_gradient: &[Matrix2<T>],
        parameters: &ConfigurationalParameters,
    ) -> ConfigurationalState<T> {
        assert_eq!(chi_gradient.len(), 2, "Need one Hessian per displacement component");
        let d = T::from(parameters.es);
        let s = T::from(parameters.s);
        let l = T::from(parameters.l);
        let s2 = s * s;
        let s4 = s2 * s2;
        let c_grad = l * l * d / s2;
        let sign = [1.0, -1.0];

        let theta = (chi.transpose() * chi - Matrix2::<T>::identity()) * 0.5;
        let eta1 = theta[(0, 0)] + theta[(1, 1)];
        let eta2 = theta[(0, 0)] - theta[(1, 1)];
        let eta6 = theta[(0, 1)];

        let mut grad_eta2 = Vector2::<T>::zeros();
        for K in 0..2 {
            for i in 0..2 {
                for J in 0..2 {
                    grad_eta2[K] += sign[J] * chi[(i, J)] * chi_gradient[i][(J, K)];
                }
            }
        }

        let psi = d / s2 * (eta1.powi(2) + eta6.powi(2)) - 2.0 * d / s2 * eta2.powi(2)
            + d / s4 * eta2.powi(4)
            + c_grad * grad_eta2.dot(&grad_eta2);

        let dpsi_deta1 = 2.0 * d / s2 * eta1;
        let dpsi_deta2 = -4.0 * d / s2 * eta2 + 4.0 * d / s4 * eta2.powi(3);
        let dpsi_deta6 = 2.0 * d / s2 * eta6;
        let G = Matrix2::new(
            dpsi_deta1 + dpsi_deta2,
            0.5 * dpsi_deta6,
            0.5 * dpsi_deta6,
            dpsi_deta1 - dpsi_deta2,
        );

        let mut D = chi * G;
        let mut B = [Matrix2::<T>::zeros(); 2];
        for i in 0..2 {
            for J in 0..2 {
                for K in 0..2 {
                    D[(i, J)] += 2.0 * c_grad * grad_eta2[K] * sign[J] * chi_gradient[i][(J, K)];
                    B[i][(J, K)] = 2.0 * c_grad * grad_eta2[K] * sign[J] * chi[(i, J)];
                }
            }
        }

        ConfigurationalState {
            theta,
            eta1,
            eta2,
            eta6,
            grad_eta2,
            energy_density: psi,
            d: D,
            b: B,
        }
    }

    /// Evaluates both energies for the configurational displacement `u_conf` and the total
    /// displacement `u_total`.
    pub fn evaluate<T: Real>(
        &self,
        u_conf: &VectorValues<T, U2>,
        u_total: &VectorValues<T, U2>,
        parameters: &ConfigurationalParameters,
    ) -> ConstitutiveState<T> {
        let chi = Matrix2::<T>::identity() + u_conf.gradient;
        let f_total = Matrix2::<T>::identity() + u_total.gradient;
        ConstitutiveState {
            standard: self.standard_state(&chi, &f_total, parameters),
            configurational: self.configurational_state(&chi, &u_conf.hessian, parameters),
        }
    }
}

/// The weak form of configurational and standard mechanical equilibrium in 2D.
///
/// With $\vec W$ the test function of the configurational displacement and $\bar{\vec w}$ that
/// of the total displacement, the contribution is
/// $$
/// r = \left[ \nabla \nabla \vec W \,\vdots\, \vec B
///     + \nabla \vec W : \left( \vec D + J_\chi \left( \vec{\mathcal{E}} \vec \chi^{-T}
///         + \frac{\partial \psi^\mathrm{S}}{\partial \vec \chi} \right) \right)
///     + \nabla \bar{\vec w} : \left( J_\chi \vec P \vec \chi^{-T} \right) \right] \mathrm{d}V,
/// $$
/// the first variation of the stored energy. Body forces and tractions are not included.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationalForces {
    parameters: ConfigurationalParameters,
    model: ConfigurationalModel,
}

impl ConfigurationalForces {
    pub fn new(parameters: ConfigurationalParameters) -> Self {
        Self {
            parameters,
            model: ConfigurationalModel,
        }
    }

    pub fn from_context(ctx: &ProblemContext) -> eyre::Result<Self> {
        let parameters = ConfigurationalParameters::from_material(ctx.material())
            .wrap_err("incomplete configurational forces material parameters")?;
        debug!("Configurational forces parameters: {:?}", parameters);
        Ok(Self::new(parameters))
    }

    pub fn parameters(&self) -> &ConfigurationalParameters {
        &self.parameters
    }

    pub fn model(&self) -> &ConfigurationalModel {
        &self.model
    }
}

#[allow(non_snake_case)]
impl<T: Real> PhysicsKernel<T, U2> for ConfigurationalForces {
    fn residual(
        &self,
        point: &QuadraturePoint<U2>,
        _c: &SolutionScalars<T, U2>,
        u: &SolutionVectors<T, U2>,
        _w1: &TestScalars<T, U2>,
        w2: &TestVectors<T, U2>,
        _ctx: &ProblemContext,
        r: &mut T,
    ) {
        let dV: T = point.integral.dv();
        let ConstitutiveState {
            standard,
            configurational,
        } = self
            .model
            .evaluate(u.current(0), u.current(1), &self.parameters);

        let chi_inv_T = standard.chi_inv.transpose();
        let J_chi = standard.j_chi;

        let W = w2.field(0);
        let mut second_gradient_term = T::zero();
        for i in 0..2 {
            for J in 0..2 {
                for K in 0..2 {
                    second_gradient_term += W.second_gradient(i, J, K) * configurational.b[i][(J, K)];
                }
            }
        }

        let configurational_stress = configurational.d
            + (standard.eshelby_stress * chi_inv_T + standard.energy_chi_derivative) * J_chi;
        let standard_stress = standard.first_piola_stress * chi_inv_T * J_chi;

        *r += (second_gradient_term
            + w2.grad(0).dot(&configurational_stress)
            + w2.grad(1).dot(&standard_stress))
            * dV;
    }
}

/// Bending of a 10 x 1 beam clamped at $X_0 = 0$, with a vertical displacement prescribed for
/// both displacement fields at $X_0 = 10$ and ramped up with time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BendingProblem {
    pub parameters: ConfigurationalParameters,
}

impl BendingProblem {
    pub fn new(parameters: ConfigurationalParameters) -> Self {
        Self { parameters }
    }

    /// The kernel for the material parameters of `ctx`.
    pub fn kernel(&self, ctx: &ProblemContext) -> eyre::Result<ConfigurationalForces> {
        ConfigurationalForces::from_context(ctx)
    }
}

impl ProblemDefinition<U2> for BendingProblem {
    fn define_parameters(&self) -> ProblemSettings {
        ProblemSettings {
            dim: 2,
            num_elements: vec![100, 10],
            lengths: vec![10.0, 1.0],
            periodic: vec![false, false],
            poly_order: 2,
            global_continuity: 1,
            dt: 0.1,
            total_time: 1.0,
            restart_iteration: 0,
            restart_time: 0.0,
            u_dirichlet: 1.0,
            vector_solution_fields: vec!["uConf".to_string(), "uTotal".to_string()],
            scalar_projection_fields: vec!["eta2".to_string()],
            material: self.parameters.to_material(),
            ..ProblemSettings::default()
        }
    }

    fn boundary_conditions(
        &self,
        ctx: &ProblemContext,
        scale: f64,
        bcs: &mut BoundaryConditions,
    ) -> Result<(), BoundaryConditionError> {
        // Dofs 0, 1 belong to uConf and 2, 3 to uTotal
        for dof in 0..4 {
            bcs.set_boundary_value(0, 0, dof, 0.0)?;
        }
        let u_y = scale * ctx.settings.u_dirichlet;
        bcs.set_boundary_value(0, 1, 1, u_y)?;
        bcs.set_boundary_value(0, 1, 3, u_y)?;
        Ok(())
    }

    fn load_scale(&self, ctx: &ProblemContext) -> f64 {
        ctx.time
    }

    fn project_fields<T>(
        &self,
        _x: &OPoint<f64, U2>,
        _c: &SolutionScalars<T, U2>,
        u: &SolutionVectors<T, U2>,
        _ctx: &ProblemContext,
    ) -> Projections<T, U2>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, U2>,
    {
        Projections::new(vec![eta2(u.grad(0))], Vec::new())
    }
}
