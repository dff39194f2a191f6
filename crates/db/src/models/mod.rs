//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and the create DTO used for inserts.

pub mod proof;
pub mod proof_cell;
pub mod status;
