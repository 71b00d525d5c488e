//! Deterministic, pure logic shared by every solver frontend.
//!
//! Core modules must be free of I/O side effects. Engines take parsed values
//! plus a [`types::Settings`] snapshot and return a [`trace::Solution`] or a
//! [`error::SolveError`]; nothing survives between calls.

pub mod arithmetic;
pub mod determinant;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod notation;
pub mod presets;
pub mod radical;
pub mod request;
pub mod state_update;
pub mod trace;
pub mod types;
