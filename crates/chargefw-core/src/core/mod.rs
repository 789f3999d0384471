//! # Core Module
//!
//! This module provides the fundamental building blocks for partial charge calculation.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds and molecules
//! - **Structural Knowledge** ([`topology`]) - Residue bond templates and bond inference
//! - **Charge Methods** ([`methods`]) - The method contract, parameter sets and solvers (EEM, MPEOE, Formal)
//! - **File I/O** ([`io`]) - PDB input and charge output
//! - **Utilities** ([`utils`]) - Atom name normalization and element helpers
//!
//! ## Scientific Foundation
//!
//! - **Electronegativity equalization** posed as a bordered symmetric linear system
//! - **Orbital electronegativity equalization** as an iterative bond-wise charge transfer
//! - **Template-based connectivity** for structures lacking explicit bonds

pub mod io;
pub mod methods;
pub mod models;
pub mod topology;
pub mod utils;
