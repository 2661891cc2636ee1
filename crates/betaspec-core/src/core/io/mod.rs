//! Readers for the auxiliary data files consumed by the core.

pub mod exchange;
