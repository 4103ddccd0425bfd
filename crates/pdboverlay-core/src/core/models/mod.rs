//! # Core Models Module
//!
//! In-memory representation of a parsed structure file.
//!
//! - [`atom`] - A single `ATOM`/`HETATM` record with every fixed-width field retained
//! - [`residue`] - A run of atoms sharing chain, residue number and insertion code
//! - [`structure`] - The ordered residue list of one model, plus its builder
//!
//! Residue order inside a [`structure::Structure`] is stable; alignment residue maps index
//! into it directly.
//!
//! ```ignore
//! use pdboverlay::core::models::structure::StructureBuilder;
//!
//! let mut builder = StructureBuilder::new();
//! builder.add_atom(atom);
//! let structure = builder.build();
//! assert_eq!(structure.sequence(), "A");
//! ```

pub mod atom;
pub mod residue;
pub mod structure;
