//! # Core Module
//!
//! Data structures and pure algorithms shared by every workflow.
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues and whole structures
//! - **File I/O** ([`io`]) - PDB records, Clustal alignments, FASTA, manifests and viewer scripts
//! - **Residue Knowledge** ([`utils`]) - Static residue-name tables and small geometry helpers
//! - **Alignment Mapping** ([`alignment`]) - Residue maps, column means, deviations and rescaling

pub mod alignment;
pub mod io;
pub mod models;
pub mod utils;
