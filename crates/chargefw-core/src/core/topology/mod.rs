//! # Topology Module
//!
//! This module provides the residue-template knowledge used to reconstruct connectivity for
//! structures that come without explicit bonds (e.g. coordinate-only PDB files).
//!
//! ## Key Components
//!
//! - [`registry`] - The two-tier residue template store (standard amino acids, then other
//!   residues), loaded lazily and shared across threads
//! - [`inference`] - Template matching per residue plus peptide-bond stitching along the backbone
//!
//! ## Usage
//!
//! ```ignore
//! use chargefw::core::topology::{inference::infer_bonds, registry::ResidueTemplateStore};
//!
//! let store = ResidueTemplateStore::from_dir(Path::new("data"));
//! let bonds = infer_bonds(molecule.atoms(), &store)?;
//! molecule.set_bonds(bonds)?;
//! ```

pub mod inference;
pub mod registry;
