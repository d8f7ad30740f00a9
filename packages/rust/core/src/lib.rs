//! Aggregation and validation logic for Quotebook.
//!
//! This crate finds the dataset root, stacks per-episode fragments into one
//! combined table, writes it out, and checks it against the maintained
//! reference sets.

pub mod dataset;
pub mod pipeline;
pub mod reference;
pub mod repo;
pub mod validate;
