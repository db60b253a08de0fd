//! Randomized unit-test generation for scanned JavaScript functions.
//!
//! Pipeline: [`resolve`] concrete tags per round, [`synth`] values under a
//! strategy, [`compose`] one case, [`suite`] the rounds of one function, then
//! [`render`] the result in a test-framework dialect. [`session`] holds the
//! per-run state the setters write into.
pub mod cli;
pub mod compose;
pub mod error;
pub mod ir;
pub mod manifest;
pub mod model;
pub mod render;
pub mod resolve;
pub mod session;
pub mod suite;
pub mod synth;
pub mod value;
