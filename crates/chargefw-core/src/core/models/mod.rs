//! # Core Models Module
//!
//! This module contains the data structures used to represent molecules for charge calculation.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom records with names, residue membership, element and coordinates
//! - [`topology`] - Bonds and bond orders, expressed as indices into a molecule's atoms
//! - [`molecule`] - An owned, validated sequence of atoms and bonds
//!
//! ## Usage
//!
//! ```ignore
//! use chargefw::core::models::{atom::Atom, molecule::Molecule};
//! use nalgebra::Point3;
//!
//! let atoms = vec![
//!     Atom::new(0, "N", "GLY", 1, Point3::new(0.0, 0.0, 0.0)),
//!     Atom::new(1, "CA", "GLY", 1, Point3::new(1.45, 0.0, 0.0)),
//! ];
//! let molecule = Molecule::new("gly", atoms)?;
//! ```

pub mod atom;
pub mod molecule;
pub mod topology;
