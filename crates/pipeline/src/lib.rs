//! Per-cell image generation for proof sheets.
//!
//! [`dispatcher::GenerationDispatcher`] spawns one background task per grid
//! cell. Each task validates its parameters, calls an
//! [`generator::ImageGenerator`], normalises the result to PNG, and writes it
//! into the proof folder with a temp-file-and-rename so a visible file is
//! always complete.

pub mod dispatcher;
pub mod error;
pub mod generator;
pub mod png;
pub mod storage;
