use super::scalar_values;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use mechanochem::assembly::{BasisValues, PointAssembler};
use mechanochem::calculus::approximate_jacobian_fd;
use mechanochem::fields::{ScalarValues, SolutionScalars, SolutionVectors, TestScalars, TestVectors};
use mechanochem::kernel::{PhysicsKernel, QuadraturePoint};
use mechanochem::nalgebra::{dvector, DVector, Matrix2, Point2, Vector2, U2};
use mechanochem::num_dual::Dual64;
use mechanochem::parameters::{MaterialParameters, ProblemContext};
use mechanochem::problem::ProblemDefinition;
use mechanochem::proptest::{phase_field_values2, scalar_test_values2};
use mechanochem_models::cahn_hilliard::{CahnHilliardAllenCahn, CahnHilliardParameters, CahnHilliardProblem};
use mechanochem_models::free_energy::QuarticDoubleWell;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn context() -> ProblemContext {
    ProblemContext::new(CahnHilliardProblem.define_parameters())
}

fn evaluate<K: PhysicsKernel<f64, U2>>(
    kernel: &K,
    point: &QuadraturePoint<U2>,
    c: &SolutionScalars<f64, U2>,
    w1: &TestScalars<f64, U2>,
) -> f64 {
    let mut r = 0.0;
    kernel.residual(
        point,
        c,
        &SolutionVectors::empty(),
        w1,
        &TestVectors::zeros(0),
        &context(),
        &mut r,
    );
    r
}

fn points() -> [QuadraturePoint<U2>; 2] {
    [
        QuadraturePoint::volume(Point2::new(0.4, 0.7)),
        QuadraturePoint::surface(Point2::new(0.4, 1.0), Vector2::new(0.0, 1.0)),
    ]
}

fn unit_value() -> ScalarValues<f64, U2> {
    scalar_values(1.0, Vector2::zeros(), Matrix2::zeros())
}

#[test]
fn parameters_round_trip_through_material() {
    let parameters = CahnHilliardParameters::default();
    assert_eq!(parameters.mobility, 0.1);
    assert_eq!(parameters.kinetic_coeff, 2.0);
    assert_eq!(parameters.kappa, 0.0005);
    assert_eq!(parameters.influx, 0.0);

    let material = parameters.to_material();
    assert_eq!(CahnHilliardParameters::from_material(&material).unwrap(), parameters);
}

#[test]
fn missing_parameters_are_reported() {
    let material = MaterialParameters::new()
        .with("mobility", 1.0)
        .with("kappa", 0.1)
        .with("influx", 0.0);
    assert!(CahnHilliardParameters::from_material(&material).is_err());

    let mut ctx = context();
    ctx.settings.material = material;
    assert!(CahnHilliardAllenCahn::from_context(&ctx).is_err());
    assert!(CahnHilliardProblem.kernel(&ctx).is_err());
}

#[test]
fn missing_influx_means_a_closed_boundary() {
    let material = MaterialParameters::new()
        .with("mobility", 1.0)
        .with("kinetic_coeff", 2.0)
        .with("kappa", 0.1);
    let parameters = CahnHilliardParameters::from_material(&material).unwrap();
    assert_eq!(parameters.influx, 0.0);
    assert_eq!(parameters.kappa, 0.1);
}

#[test]
fn problem_settings_are_valid() {
    let settings = CahnHilliardProblem.define_parameters();
    settings.validate().unwrap();
    assert_eq!(settings.num_elements, vec![20, 20]);
    assert_eq!(settings.periodic, vec![true, true]);
    assert_eq!(settings.dofs_per_node(), 2);
    assert_eq!(settings.scalar_solution_fields, vec!["c".to_string(), "eta".to_string()]);

    let kernel = CahnHilliardProblem.kernel(&context()).unwrap();
    assert_eq!(kernel.parameters(), &CahnHilliardParameters::default());
}

#[test]
fn initial_conditions_perturb_equal_mixture() {
    let ctx = context();
    let problem = CahnHilliardProblem;
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Point2::new(0.25, 0.75);
    for _ in 0..200 {
        let c = problem.scalar_initial_condition(&x, 0, &ctx, &mut rng);
        let eta = problem.scalar_initial_condition(&x, 1, &ctx, &mut rng);
        assert!((0.495..=0.505).contains(&c), "c = {}", c);
        assert!((0.485..=0.515).contains(&eta), "eta = {}", eta);
    }
    assert_eq!(problem.scalar_initial_condition(&x, 2, &ctx, &mut rng), 0.0);

    let sample = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..10)
            .map(|_| problem.scalar_initial_condition(&x, 0, &ctx, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(sample(7), sample(7));
}

#[test]
fn time_derivative_and_allen_cahn_reaction() {
    let kernel = CahnHilliardAllenCahn::new(CahnHilliardParameters::default());
    let point = QuadraturePoint::volume(Point2::new(0.5, 0.5));
    let constant = |value: f64| scalar_values(value, Vector2::zeros(), Matrix2::zeros());
    let c = SolutionScalars::new(vec![constant(0.6), constant(0.5)], vec![constant(0.5), constant(0.5)]);

    // (0.6 - 0.5) / 0.1
    let w_c = TestScalars::new(vec![unit_value(), ScalarValues::zeros()]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_c), 1.0, comp = abs, tol = 1e-12);

    // L F_eta(0.6, 0.5) = 2 * 0.48
    let w_eta = TestScalars::new(vec![ScalarValues::zeros(), unit_value()]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_eta), 0.96, comp = abs, tol = 1e-12);
}

/// Parameters with `M = 0.5`, `L = 2` and `kappa = 0.1`, and fields at the equal mixture
/// `c = eta = 0.5` (no time derivative) with gradients and curvature.
///
/// There `F_cc = -0.06`, `F_ceta = 0.576` and `F_eta = 0`.
fn graded_mixture() -> (CahnHilliardAllenCahn, SolutionScalars<f64, U2>) {
    let kernel = CahnHilliardAllenCahn::new(CahnHilliardParameters {
        mobility: 0.5,
        kinetic_coeff: 2.0,
        kappa: 0.1,
        influx: 0.0,
    });
    let c = scalar_values(0.5, Vector2::new(0.2, 0.1), Matrix2::new(0.3, 0.0, 0.0, 0.1));
    let eta = scalar_values(0.5, Vector2::new(0.4, 0.3), Matrix2::zeros());
    let fields = SolutionScalars::new(vec![c.clone(), eta.clone()], vec![c, eta]);
    (kernel, fields)
}

#[test]
fn flux_and_gradient_energy_terms_at_a_volume_point() {
    let (kernel, c) = graded_mixture();
    let point = QuadraturePoint::volume(Point2::new(0.5, 0.5));

    // M grad w . (F_cc grad c + F_ceta grad eta) = 0.5 * (1, 2) . (0.2184, 0.1668)
    let w_flux = TestScalars::new(vec![
        scalar_values(0.0, Vector2::new(1.0, 2.0), Matrix2::zeros()),
        ScalarValues::zeros(),
    ]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_flux), 0.276, comp = abs, tol = 1e-12);

    // M kappa lap(w) lap(c) = 0.5 * 0.1 * 2.0 * 0.4
    let w_curvature = TestScalars::new(vec![
        scalar_values(0.0, Vector2::zeros(), Matrix2::new(0.5, 0.0, 0.0, 1.5)),
        ScalarValues::zeros(),
    ]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_curvature), 0.04, comp = abs, tol = 1e-12);

    // L kappa grad w . grad eta = 2 * 0.1 * (1, 2) . (0.4, 0.3)
    let w_eta = TestScalars::new(vec![
        ScalarValues::zeros(),
        scalar_values(0.0, Vector2::new(1.0, 2.0), Matrix2::zeros()),
    ]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_eta), 0.2, comp = abs, tol = 1e-12);
}

#[test]
fn nitsche_terms_at_a_surface_point() {
    let (kernel, c) = graded_mixture();
    let point = QuadraturePoint::surface(Point2::new(1.0, 0.5), Vector2::new(1.0, 0.0));

    // Tangential test gradient: only -M kappa lap(w) (grad c . n) = -0.05 * 2.0 * 0.2 remains
    let w_tangential = TestScalars::new(vec![
        scalar_values(0.0, Vector2::new(0.0, 1.0), Matrix2::new(0.5, 0.0, 0.0, 1.5)),
        ScalarValues::zeros(),
    ]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_tangential), -0.02, comp = abs, tol = 1e-12);

    // -M kappa lap(c) (grad w . n) + tau (grad w . n)(grad c . n) = -0.05 * 0.4 + 2.0 * 0.2
    let w_normal = TestScalars::new(vec![
        scalar_values(0.0, Vector2::new(1.0, 0.0), Matrix2::zeros()),
        ScalarValues::zeros(),
    ]);
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w_normal), 0.38, comp = abs, tol = 1e-12);
}

#[test]
fn boundary_terms_carry_influx_and_penalty() {
    let parameters = CahnHilliardParameters {
        influx: 0.5,
        ..CahnHilliardParameters::default()
    };
    let kernel = CahnHilliardAllenCahn::new(parameters);
    let point = QuadraturePoint::surface(Point2::new(1.0, 0.5), Vector2::new(1.0, 0.0));
    let c = SolutionScalars::new(
        vec![scalar_values(0.5, Vector2::new(0.2, 0.0), Matrix2::zeros()), ScalarValues::zeros()],
        vec![ScalarValues::zeros(), ScalarValues::zeros()],
    );
    let w1 = TestScalars::new(vec![
        scalar_values(1.0, Vector2::new(1.0, 0.0), Matrix2::zeros()),
        ScalarValues::zeros(),
    ]);

    // -j_n w + tau (grad w . n)(grad c . n), tau = 0.1 * 20 / 1
    assert_scalar_eq!(evaluate(&kernel, &point, &c, &w1), -0.5 + 2.0 * 0.2, comp = abs, tol = 1e-12);
}

#[test]
fn jacobian_agrees_with_finite_differences() {
    let ctx = context();
    let basis = vec![
        BasisValues::new(0.5, Vector2::new(1.2, -0.4), Matrix2::new(3.0, 0.5, 0.5, -2.0)),
        BasisValues::new(0.3, Vector2::new(-0.6, 0.9), Matrix2::new(-1.0, 1.5, 1.5, 2.5)),
        BasisValues::new(0.2, Vector2::new(-0.6, -0.5), Matrix2::new(-2.0, -2.0, -2.0, -0.5)),
    ];
    let coefficients = dvector![0.45, 0.6, 0.52, 0.3, 0.55, 0.8];
    let previous = dvector![0.5, 0.5, 0.5, 0.5, 0.5, 0.5];

    let multi_well = CahnHilliardAllenCahn::new(CahnHilliardParameters::default());
    check_jacobian("multi-well", &multi_well, &ctx, &basis, &coefficients, &previous);
    let quartic = CahnHilliardAllenCahn::with_free_energy(CahnHilliardParameters::default(), QuarticDoubleWell);
    check_jacobian("quartic", &quartic, &ctx, &basis, &coefficients, &previous);
}

fn check_jacobian<K>(
    name: &str,
    kernel: &K,
    ctx: &ProblemContext,
    basis: &[BasisValues<U2>],
    coefficients: &DVector<f64>,
    previous: &DVector<f64>,
) where
    K: PhysicsKernel<f64, U2> + PhysicsKernel<Dual64, U2>,
{
    let assembler = PointAssembler::from_context(kernel, ctx);
    for point in points() {
        let jacobian = assembler
            .assemble_point_jacobian(&point, 0.7, basis, coefficients, previous)
            .unwrap();
        let jacobian_fd = approximate_jacobian_fd(coefficients, 1e-6, |x| {
            assembler
                .assemble_point_residual(&point, 0.7, basis, x, previous)
                .unwrap()
        });
        assert_matrix_eq!(jacobian, jacobian_fd, comp = abs, tol = 1e-7);
        assert!(jacobian.iter().all(|x| x.is_finite()), "{}: non-finite Jacobian", name);
    }
}

proptest! {
    #[test]
    fn residual_vanishes_for_zero_test_functions(
        c in phase_field_values2(),
        eta in phase_field_values2(),
        c_prev in phase_field_values2(),
    ) {
        let kernel = CahnHilliardAllenCahn::new(CahnHilliardParameters { influx: 0.3, ..Default::default() });
        let fields = SolutionScalars::new(vec![c, eta.clone()], vec![c_prev, eta]);
        for point in points() {
            prop_assert_eq!(evaluate(&kernel, &point, &fields, &TestScalars::zeros(2)), 0.0);
        }
    }

    #[test]
    fn residual_is_linear_in_test_functions(
        c in phase_field_values2(),
        eta in phase_field_values2(),
        w_c in scalar_test_values2(),
        w_eta in scalar_test_values2(),
        k in -3.0 .. 3.0,
    ) {
        let kernel = CahnHilliardAllenCahn::new(CahnHilliardParameters { influx: 0.3, ..Default::default() });
        let fields = SolutionScalars::new(vec![c.clone(), eta.clone()], vec![c, eta]);
        let w1 = TestScalars::new(vec![w_c, w_eta]);
        for point in points() {
            let r = evaluate(&kernel, &point, &fields, &w1);
            let r_scaled = evaluate(&kernel, &point, &fields, &w1.scaled(k));
            prop_assert!((r_scaled - k * r).abs() <= 1e-12 * (1.0 + r.abs()));
        }
    }
}
