//! Stable exit codes for the `stepwise` CLI.

/// The engine produced a result.
pub const OK: i32 = 0;
/// Invalid invocation or config, or an I/O failure.
pub const INVALID: i32 = 1;
/// The engine reported a parse, dimension, domain or numerical error.
pub const SOLVE_FAILED: i32 = 2;
