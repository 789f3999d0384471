//! # Workflows Module
//!
//! High-level entry points that take molecules from input to computed charges.
//!
//! ## Overview
//!
//! A workflow resolves the requested method, validates its parameter set, infers missing bonds
//! where needed and runs the method on each molecule. Per-molecule failures are collected
//! rather than aborting the batch, so one bad structure does not cost the rest.
//!
//! - **Charges Workflow** ([`charges`]) - Batch charge calculation, parallel when the
//!   `parallel` feature is enabled.

pub mod charges;
