//! Domain logic for proof sheets: the parameter registry, range
//! calculation, grid assembly, and submission validation.
//!
//! Nothing in this crate touches the database or the network.

pub mod error;
pub mod grid;
pub mod params;
pub mod proof;
pub mod range;
pub mod types;
