//! # ChargeFW Core Library
//!
//! A library for computing per-atom partial charges of molecules with empirical methods,
//! built around the Electronegativity Equalization Method (EEM).
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Atom`, `Bond`), the
//!   residue template store and bond inference, the charge-method abstraction with its
//!   concrete solvers, and I/O utilities.
//!
//! - **[`engine`]: Orchestration Support.** Calculation configuration, progress reporting and
//!   the error type that ties the lower-level failures together.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures such as computing charges for a
//!   batch of molecules, inferring missing bonds along the way.

pub mod core;
pub mod engine;
pub mod workflows;
