//! Repository structs with static async query methods.

pub mod proof_cell_repo;
pub mod proof_repo;

pub use proof_cell_repo::ProofCellRepo;
pub use proof_repo::ProofRepo;
