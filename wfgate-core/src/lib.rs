//! Wfgate Core
//!
//! Core types and abstractions for the wfgate workflow gate.
//!
//! This crate contains:
//! - Domain types: workflow run records, statuses, and repository identity
//! - The pure run filter applied to every observation the gate makes

pub mod domain;
pub mod error;

pub use error::FilterError;
