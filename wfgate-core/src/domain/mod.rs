//! Core domain types
//!
//! This module contains the domain structures shared between the GitHub
//! client and the gate binary: the workflow run record as reported by the
//! external service, and the filter that decides which of those runs the
//! gate actually cares about.

pub mod filter;
pub mod run;
