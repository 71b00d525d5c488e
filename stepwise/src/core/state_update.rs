//! Solver state and its pure transition function.

use std::collections::BTreeMap;

use crate::core::presets::example_inputs;
use crate::core::request::{SolveResponse, build_request, solve};
use crate::core::types::{InputField, Operation, Settings};

/// Everything a frontend needs to render the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverState {
    pub operation: Operation,
    pub inputs: BTreeMap<InputField, String>,
    /// Result of the last `Solve`; cleared whenever inputs change.
    pub outcome: Option<SolveResponse>,
    pub settings: Settings,
}

impl Default for SolverState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SolverState {
    pub fn new(settings: Settings) -> Self {
        Self {
            operation: Operation::Determinant,
            inputs: BTreeMap::new(),
            outcome: None,
            settings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch operation; inputs and outcome are cleared.
    SelectOperation(Operation),
    SetInput(InputField, String),
    /// Replace inputs with the example for the current operation.
    LoadExample,
    Solve,
    /// Back to the default state, keeping settings.
    Reset,
    Configure(Settings),
}

/// Apply `action` to `state`, returning the next state.
///
/// `Solve` runs the engine synchronously; a missing or malformed input becomes
/// an error outcome rather than a failed transition.
pub fn transition(state: &SolverState, action: Action) -> SolverState {
    let mut next = state.clone();
    match action {
        Action::SelectOperation(operation) => {
            next.operation = operation;
            next.inputs.clear();
            next.outcome = None;
        }
        Action::SetInput(field, value) => {
            next.inputs.insert(field, value);
            next.outcome = None;
        }
        Action::LoadExample => {
            next.inputs = example_inputs(state.operation);
            next.outcome = None;
        }
        Action::Solve => {
            let response = match build_request(state.operation, &state.inputs) {
                Ok(request) => solve(&request, &state.settings),
                Err(err) => SolveResponse::failure(&err),
            };
            next.outcome = Some(response);
        }
        Action::Reset => {
            next = SolverState::new(state.settings);
        }
        Action::Configure(settings) => {
            next.settings = settings;
            next.outcome = None;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::request::SolveValue;

    #[test]
    fn solve_with_missing_input_is_a_parse_error() {
        let state = transition(
            &SolverState::default(),
            Action::SelectOperation(Operation::Root),
        );
        let state = transition(&state, Action::SetInput(InputField::Radicand, "8".into()));
        let state = transition(&state, Action::Solve);
        let outcome = state.outcome.expect("outcome");
        assert_eq!(outcome.error.map(|e| e.kind), Some(ErrorKind::Parse));
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn select_operation_clears_inputs_and_outcome() {
        let state = transition(&SolverState::default(), Action::LoadExample);
        let state = transition(&state, Action::Solve);
        assert!(state.outcome.is_some());
        let state = transition(&state, Action::SelectOperation(Operation::Add));
        assert_eq!(state.operation, Operation::Add);
        assert!(state.inputs.is_empty());
        assert!(state.outcome.is_none());
    }

    #[test]
    fn load_example_then_solve() {
        let state = transition(
            &SolverState::default(),
            Action::SelectOperation(Operation::Distance),
        );
        let state = transition(&state, Action::LoadExample);
        for field in Operation::Distance.required_inputs() {
            assert!(state.inputs.contains_key(field));
        }
        let state = transition(&state, Action::Solve);
        let outcome = state.outcome.expect("outcome");
        assert_eq!(outcome.result, Some(SolveValue::Number(5.0)));
    }

    #[test]
    fn set_input_invalidates_outcome() {
        let state = transition(&SolverState::default(), Action::LoadExample);
        let state = transition(&state, Action::Solve);
        let state = transition(&state, Action::SetInput(InputField::Matrix, "1".into()));
        assert!(state.outcome.is_none());
        assert_eq!(state.inputs[&InputField::Matrix], "1");
    }

    #[test]
    fn reset_restores_default_but_keeps_settings() {
        let settings = Settings {
            decimal_places: 2,
            ..Settings::default()
        };
        let state = transition(&SolverState::default(), Action::Configure(settings));
        let state = transition(&state, Action::SelectOperation(Operation::Power));
        let state = transition(&state, Action::LoadExample);
        let state = transition(&state, Action::Reset);
        assert_eq!(state, SolverState::new(settings));
    }

    #[test]
    fn transition_leaves_the_input_state_untouched() {
        let before = transition(&SolverState::default(), Action::LoadExample);
        let snapshot = before.clone();
        let _ = transition(&before, Action::Solve);
        assert_eq!(before, snapshot);
    }
}
