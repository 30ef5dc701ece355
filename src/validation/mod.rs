//! Validation pipeline.
//!
//! Validators are plain values listed in the order they should run. The
//! runner stops at the first failure instead of collecting every error.

pub mod pipeline;

pub use pipeline::{run_validators, Pipeline, Validator};
