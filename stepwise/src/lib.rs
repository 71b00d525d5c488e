//! Trace-generating math engines.
//!
//! Every engine returns its result together with an ordered derivation trace
//! that a student can follow line by line, usually closed by a verification
//! section that re-derives the input from the output. The architecture
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic engines, the typed request dispatch and
//!   the solver state reducer. No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files).
//!
//! [`session`] coordinates both for the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
