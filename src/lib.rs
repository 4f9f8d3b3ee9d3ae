//! Geomat - Material-point constitutive models for porous media and geomechanics
//!
//! This crate implements the local (integration-point) layer of a finite element solver
//! for geotechnical and porous-media problems:
//!
//! * [material] -- stress-strain models for solids (linear elasticity, von Mises and
//!   Drucker-Prager plasticity) with consistent and continuous tangent moduli
//! * [porous] -- liquid retention models and the backward-Euler update of the liquid
//!   saturation with consistent derivatives
//! * [base] -- parameters, errors, the model registry, Mandel-basis helpers and numerical derivatives
//!
//! Each family comes with a driver that follows a loading path and compares the
//! analytical tangents against numerical derivatives.
//!
//! # Notation
//!
//! Stresses and strains are stored as vectors in the Mandel basis with `nsig = 2 ndim`
//! components, e.g., `σ = {σxx, σyy, σzz, √2 σxy}` in 2D. The mean pressure is positive
//! in compression, `p = -tr(σ)/3`, and the deviatoric invariant is `q = √(3/2) ‖dev(σ)‖`.

/// Defines a type alias for the vector type
pub type Vector = nalgebra::DVector<f64>;

/// Defines a type alias for the matrix type
pub type Matrix = nalgebra::DMatrix<f64>;

pub mod base;
pub mod material;
pub mod porous;
pub mod prelude;

pub use crate::base::ModelError;
