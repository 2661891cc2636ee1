//! Numerical utilities shared by the spectral functions and the engine.

pub mod elements;
pub mod integration;
pub mod special;
