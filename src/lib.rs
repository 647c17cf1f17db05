//! Pointwise physics kernels for phase-field and configurational-mechanics solvers.
//!
//! A kernel is a pure function of the field values, gradients and Hessians at one quadrature
//! point. It accumulates its weak-form contribution for one test function into a caller-owned
//! scalar. Kernels are written once against the differentiable scalar [`Real`] so that the same
//! code yields residual values (`f64`) and Jacobian entries (dual numbers).
//!
//! Mesh handling, spline bases, global assembly and the nonlinear solve are the responsibility
//! of the surrounding solver framework. The [`assembly`] module only plays the framework's role
//! at a single quadrature point.
pub mod assembly;
pub mod boundary;
pub mod calculus;
pub mod fields;
pub mod kernel;
pub mod parameters;
pub mod problem;
pub mod tensor;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;
pub extern crate num_dual;

pub use mechanochem_traits::{allocators, Real, SmallDim};
