//! Problems and physics kernels built on `mechanochem`.
//!
//! - [`cahn_hilliard`]: coupled Cahn-Hilliard/Allen-Cahn phase separation with Nitsche boundary
//!   terms.
//! - [`configurational`]: finite-deformation bending with an evolving material configuration.
pub mod cahn_hilliard;
pub mod configurational;
pub mod free_energy;
