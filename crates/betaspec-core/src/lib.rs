//! # BetaSpec Core Library
//!
//! Computes the shape of allowed nuclear beta-decay spectra by composing a kinematic
//! phase-space factor with a configurable chain of spectral corrections, and derives the
//! observables (log ft, mean energy) used to compare measured and theoretical decay strengths.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Physical constants, the finite-size expansion tables,
//!   transition models and their derived parameters, the spectral correction functions,
//!   numerical utilities (integration, special functions) and file I/O.
//!
//! - **[`engine`]: The Logic Core.** The correction pipeline that composes the enabled
//!   corrections in canonical order for both the electron and antineutrino channels, the
//!   energy grid, the spectrum generator with its trace, and the derived observables.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that tie `core` and `engine`
//!   together: initialize a transition, generate its spectrum and compute its observables.

pub mod core;
pub mod engine;
pub mod workflows;
