//! # PDBOverlay Core Library
//!
//! Bookkeeping for overlaying several models of the same protein: splitting multi-model
//! structure files, translating a multiple sequence alignment back onto residues, and
//! annotating each residue with its deviation from the mean structure.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless structure models, PDB/alignment I/O, residue
//!   lookup tables, and the alignment-to-residue mapping with its mean and deviation math.
//!
//! - **[`engine`]: The Plumbing.** Configuration, error types, progress reporting, and the
//!   runner for the external aligner, superposer and viewer programs.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built from the layers below:
//!   model splitting, the overlay pipeline, and per-chain sequence extraction.

pub mod core;
pub mod engine;
pub mod workflows;
