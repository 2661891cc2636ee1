//! # Engine Module
//!
//! Turns derived transition parameters into a sampled spectrum.
//!
//! ## Overview
//!
//! The engine composes the enabled spectral corrections into per-energy weights for the
//! electron and antineutrino channels, walks those weights over an energy grid, and integrates
//! the resulting table into observables. Every stage is deterministic for a given input.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Correction toggles, couplings, matrix elements and the spectrum window
//! - **Pipeline** ([`pipeline`]) - Canonical correction ordering and per-channel weight evaluation
//! - **Energy Grid** ([`grid`]) - Resolution of a kinetic energy window into grid points
//! - **Generation** ([`generator`]) - Spectrum generation with optional per-point trace
//! - **Spectrum** ([`spectrum`]) - The generated table
//! - **Observables** ([`observables`]) - Phase-space integral, log ft and mean energies
//! - **Trace** ([`trace`]) - Sinks receiving one record per grid point
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for long generations
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod observables;
pub mod pipeline;
pub mod progress;
pub mod spectrum;
pub mod trace;
