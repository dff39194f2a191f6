//! Client for the Replicate hosted inference API.
//!
//! Creates predictions against a model, waits for them to settle, and
//! downloads the produced files.

pub mod api;
pub mod prediction;
