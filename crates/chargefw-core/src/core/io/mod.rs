//! Provides input/output functionality for molecular structures and computed charges.
//!
//! Structure formats implement the [`traits::MolecularFile`] trait; the PDB reader lives in
//! [`pdb`]. Computed charges are written by [`charges`] as plain text or CSV.

pub mod charges;
pub mod pdb;
pub mod traits;
