//! Provides input/output functionality for the file formats the overlay pipeline touches.
//!
//! Structure files are read and written through the [`traits::StructureFile`] trait; the
//! remaining modules cover the plain-text side files exchanged with external programs.

pub mod aln;
pub mod fasta;
pub mod manifest;
pub mod pdb;
pub mod script;
pub mod traits;
