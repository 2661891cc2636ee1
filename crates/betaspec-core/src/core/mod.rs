//! # Core Module
//!
//! Stateless building blocks for beta-spectrum calculations.
//!
//! - **Constants** ([`constants`]) - Physical constants and energy unit conversions
//! - **Expansion Tables** ([`tables`]) - Fixed coefficient matrices of the finite-size expansion
//! - **Transitions** ([`transition`]) - Transition input models, sanity checks and derived parameters
//! - **Spectral Functions** ([`spectral`]) - One pure function per spectral correction
//! - **Utilities** ([`utils`]) - Numerical integration and special functions
//! - **File I/O** ([`io`]) - Atomic exchange coefficient tables

pub mod constants;
pub mod io;
pub mod spectral;
pub mod tables;
pub mod transition;
pub mod utils;
