//! One-shot solver sessions driven through the state reducer.
//!
//! Frontends that collect inputs up front (the CLI) replay them as actions so
//! they see exactly the transitions an interactive frontend would.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::state_update::{Action, SolverState, transition};
use crate::core::trace::{StepTrace, TraceItem};
use crate::core::types::{InputField, Operation, Settings};
use crate::io::config::load_config;

/// Collected inputs for a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub operation: Operation,
    /// Start from the operation's example; explicit inputs override it.
    pub use_example: bool,
    pub inputs: Vec<(InputField, String)>,
}

impl Invocation {
    pub fn actions(&self, settings: Settings) -> Vec<Action> {
        let mut actions = vec![
            Action::Configure(settings),
            Action::SelectOperation(self.operation),
        ];
        if self.use_example {
            actions.push(Action::LoadExample);
        }
        actions.extend(
            self.inputs
                .iter()
                .map(|(field, value)| Action::SetInput(*field, value.clone())),
        );
        actions.push(Action::Solve);
        actions
    }
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let cfg = load_config(path).with_context(|| format!("load config {}", path.display()))?;
    info!(path = %path.display(), "config loaded");
    Ok(cfg.to_settings())
}

/// Replay `invocation` from a fresh state and return the final state.
pub fn run(invocation: &Invocation, settings: Settings) -> SolverState {
    invocation
        .actions(settings)
        .into_iter()
        .fold(SolverState::new(settings), |state, action| {
            transition(&state, action)
        })
}

/// Trace lines as terminal text, the verification section under a heading.
pub fn render_trace(trace: &StepTrace) -> String {
    let mut out = String::new();
    for item in trace.items() {
        match item {
            TraceItem::Line(text) => {
                out.push_str(text);
                out.push('\n');
            }
            TraceItem::VerificationSeparator => out.push_str("\nVerification:\n"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::SolveValue;

    #[test]
    fn explicit_inputs_override_the_example() {
        let invocation = Invocation {
            operation: Operation::Root,
            use_example: true,
            inputs: vec![
                (InputField::Radicand, "8".to_string()),
                (InputField::Index, "3".to_string()),
            ],
        };
        let state = run(&invocation, Settings::default());
        let outcome = state.outcome.expect("outcome");
        assert_eq!(outcome.result, Some(SolveValue::Number(2.0)));
    }

    #[test]
    fn render_trace_marks_verification() {
        let mut trace = StepTrace::new();
        trace.line("step");
        trace.begin_verification();
        trace.line("check");
        assert_eq!(render_trace(&trace), "step\n\nVerification:\ncheck\n");
    }

    #[test]
    fn load_settings_defaults_without_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(&temp.path().join("stepwise.toml")).expect("settings");
        assert_eq!(settings, Settings::default());
    }
}
