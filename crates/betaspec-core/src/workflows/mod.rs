//! # Workflows Module
//!
//! End-to-end procedures built on [`crate::core`] and [`crate::engine`].
//!
//! ## Overview
//!
//! A workflow takes user-level inputs (a transition description, a generator configuration
//! and a spectrum window), runs every stage in order and returns a self-contained result.
//! Resource loading stays with the caller so the same workflow serves the CLI and tests.
//!
//! - **Generation Workflow** ([`generate`]) - Initializes a transition, generates its
//!   spectrum and derives the log ft and mean energies.

pub mod generate;
