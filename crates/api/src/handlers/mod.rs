pub mod pages;
pub mod proofs;
