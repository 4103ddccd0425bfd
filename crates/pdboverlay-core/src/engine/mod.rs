//! # Engine Module
//!
//! Plumbing shared by the workflows: run configuration, error types, progress reporting,
//! and invocation of the external programs that do the heavy lifting.
//!
//! - **Configuration** ([`config`]) - Work directory, thresholds, colour range and tool commands
//! - **Error Handling** ([`error`]) - The workflow-level error type
//! - **Progress Monitoring** ([`progress`]) - Callback-based phase and task reporting
//! - **External Programs** ([`tools`]) - Placeholder expansion, execution and typed outcomes

pub mod config;
pub mod error;
pub mod progress;
pub mod tools;
