//! I/O helpers for the solver binaries.

pub mod config;
