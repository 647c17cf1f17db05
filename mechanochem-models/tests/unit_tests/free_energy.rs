use matrixcompare::assert_scalar_eq;
use mechanochem::num_dual::Dual64;
use mechanochem_models::free_energy::{ChemicalFreeEnergy, CoupledMultiWell, QuarticDoubleWell};
use proptest::prelude::*;

#[test]
fn coupled_multi_well_at_equal_mixture() {
    let (c, eta) = (0.5_f64, 0.5_f64);
    let f = CoupledMultiWell;
    assert_scalar_eq!(f.f_cc(c, eta), -0.06, comp = abs, tol = 1e-14);
    assert_scalar_eq!(f.f_ceta(c, eta), 0.576, comp = abs, tol = 1e-14);
    assert_scalar_eq!(f.f_eta(c, eta), 0.0, comp = abs, tol = 1e-14);
}

#[test]
fn coupled_multi_well_mixed_derivatives_differ() {
    // d(F_cc)/d(eta) and d(F_ceta)/dc would agree if both derived from one potential
    let f = CoupledMultiWell;
    let d_fcc_deta = f.f_cc(Dual64::from(0.5), Dual64::new(0.3, 1.0)).eps;
    let d_fceta_dc = f.f_ceta(Dual64::new(0.5, 1.0), Dual64::from(0.3)).eps;
    assert_scalar_eq!(d_fcc_deta, -4.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(d_fceta_dc, -3.84, comp = abs, tol = 1e-12);
}

#[test]
fn quartic_double_well_at_equal_mixture() {
    let (c, eta) = (0.5_f64, 0.5_f64);
    let f = QuarticDoubleWell;
    assert_scalar_eq!(f.f_cc(c, eta), -0.32, comp = abs, tol = 1e-14);
    assert_scalar_eq!(f.f_ceta(c, eta), 0.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(f.f_eta(c, eta), 0.0256, comp = abs, tol = 1e-14);
    assert_scalar_eq!(f.energy_density(c, eta), 0.0128 + 0.0081, comp = abs, tol = 1e-14);
}

/// `dF/dc` by forward-mode differentiation of the energy density.
fn quartic_f_c(c: f64, eta: f64) -> f64 {
    QuarticDoubleWell
        .energy_density(Dual64::new(c, 1.0), Dual64::from(eta))
        .eps
}

proptest! {
    #[test]
    fn quartic_double_well_derivatives_match_energy_density(c in -0.5 .. 1.5, eta in -0.5 .. 1.5) {
        let f = QuarticDoubleWell;
        let h = 1e-5;
        let f_cc_fd = (quartic_f_c(c + h, eta) - quartic_f_c(c - h, eta)) / (2.0 * h);
        let f_ceta_fd = (quartic_f_c(c, eta + h) - quartic_f_c(c, eta - h)) / (2.0 * h);
        let f_eta_ad = f.energy_density(Dual64::from(c), Dual64::new(eta, 1.0)).eps;

        prop_assert!((f.f_cc(c, eta) - f_cc_fd).abs() <= 1e-7);
        prop_assert!((f.f_ceta(c, eta) - f_ceta_fd).abs() <= 1e-7);
        prop_assert!((f.f_eta(c, eta) - f_eta_ad).abs() <= 1e-12);
    }

    #[test]
    fn dual_evaluation_carries_the_real_value(c in 0.0 .. 1.0, eta in 0.0 .. 1.0) {
        let f = CoupledMultiWell;
        let dual = f.f_cc(Dual64::new(c, 1.0), Dual64::new(eta, 1.0));
        prop_assert!((dual.re - f.f_cc(c, eta)).abs() <= 1e-14 * (1.0 + dual.re.abs()));
    }
}
