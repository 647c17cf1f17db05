//! Chemical free energies of two coupled phase fields.
//!
//! The phase-field kernels only need the derivatives $F_{,cc}$, $F_{,c\eta}$ and $F_{,\eta}$ of a
//! free energy density $F(c, \eta)$ in terms of the concentration $c$ and the order parameter
//! $\eta$. Inputs are evaluated as-is, also outside of $[0, 1]$.
use mechanochem::Real;
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

pub trait ChemicalFreeEnergy<T>: Send + Sync
where
    T: Real,
{
    /// Second derivative with respect to the concentration, $F_{,cc}$.
    fn f_cc(&self, c: T, eta: T) -> T;

    /// Mixed second derivative, $F_{,c\eta}$.
    fn f_ceta(&self, c: T, eta: T) -> T;

    /// First derivative with respect to the order parameter, $F_{,\eta}$.
    fn f_eta(&self, c: T, eta: T) -> T;
}

/// The multi-well free energy of the coupled Cahn-Hilliard/Allen-Cahn problem.
///
/// The derivatives are
/// $$
/// \begin{aligned}
/// F_{,cc} &= 2c \left[ (c - 0.1)^2 + (c - 0.9)^2 + 5(\eta - 0.2)^2 + 5(\eta - 0.8)^2 \right]
///     + 8 (c - 0.1)(c - 0.9), \\\\
/// F_{,c\eta} &= 20 \left[ (c - 0.1)^2 (\eta - 0.2)^2 + (c - 0.9)^2 (\eta - 0.8)^2 \right], \\\\
/// F_{,\eta} &= 10 (\eta - 0.8) \left[ (c - 0.9)^2 + 5 (\eta - 0.2)^2 \right]
///     + 10 (\eta - 0.2) \left[ (c - 0.1)^2 + 5 (\eta - 0.8)^2 \right].
/// \end{aligned}
/// $$
///
/// These three expressions are not the derivatives of a single common potential. Use
/// [`QuarticDoubleWell`] where consistency with an energy density is required.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupledMultiWell;

#[replace_float_literals(T::from(literal))]
impl<T> ChemicalFreeEnergy<T> for CoupledMultiWell
where
    T: Real,
{
    fn f_cc(&self, c: T, eta: T) -> T {
        2.0 * c * ((c - 0.1).powi(2) + (c - 0.9).powi(2) + 5.0 * (eta - 0.2).powi(2) + 5.0 * (eta - 0.8).powi(2))
            + 8.0 * (c - 0.1) * (c - 0.9)
    }

    fn f_ceta(&self, c: T, eta: T) -> T {
        20.0 * ((c - 0.1).powi(2) * (eta - 0.2).powi(2) + (c - 0.9).powi(2) * (eta - 0.8).powi(2))
    }

    fn f_eta(&self, c: T, eta: T) -> T {
        10.0 * (eta - 0.8) * ((c - 0.9).powi(2) + 5.0 * (eta - 0.2).powi(2))
            + 10.0 * (eta - 0.2) * ((c - 0.1).powi(2) + 5.0 * (eta - 0.8).powi(2))
    }
}

/// A double well in each field, with the concentration wells weighted by $\eta$:
/// $$
/// F(c, \eta) = \eta (c - 0.1)^2 (c - 0.9)^2 + (\eta - 0.2)^2 (\eta - 0.8)^2.
/// $$
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarticDoubleWell;

impl QuarticDoubleWell {
    #[replace_float_literals(T::from(literal))]
    pub fn energy_density<T: Real>(&self, c: T, eta: T) -> T {
        eta * (c - 0.1).powi(2) * (c - 0.9).powi(2) + (eta - 0.2).powi(2) * (eta - 0.8).powi(2)
    }
}

#[replace_float_literals(T::from(literal))]
impl<T> ChemicalFreeEnergy<T> for QuarticDoubleWell
where
    T: Real,
{
    fn f_cc(&self, c: T, eta: T) -> T {
        2.0 * eta * ((2.0 * c - 1.0).powi(2) + 2.0 * (c - 0.1) * (c - 0.9))
    }

    fn f_ceta(&self, c: T, _eta: T) -> T {
        2.0 * (c - 0.1) * (c - 0.9) * (2.0 * c - 1.0)
    }

    fn f_eta(&self, c: T, eta: T) -> T {
        (c - 0.1).powi(2) * (c - 0.9).powi(2) + 2.0 * (eta - 0.2) * (eta - 0.8) * (2.0 * eta - 1.0)
    }
}
