use crate::error::StateMachineError;
use crate::types::EngineState;

/// Validates an engine state transition.
///
/// Illegal transitions return an error so callers can surface them; enable
/// the `strict-debug` feature to panic instead.
pub fn validate_transition(from: EngineState, to: EngineState) -> Result<(), StateMachineError> {
    if allowed(from, to) {
        return Ok(());
    }

    if cfg!(feature = "strict-debug") {
        panic!("Illegal engine transition attempted: {from:?} -> {to:?}");
    }

    Err(StateMachineError::IllegalTransition { from, to })
}

pub fn allowed_transitions(from: EngineState) -> Vec<EngineState> {
    use EngineState::*;
    match from {
        Uninitialized => vec![Ready],
        Ready => vec![Growing, Done],
        Growing => vec![Growing, Done],
        Done => vec![Growing],
    }
}

fn allowed(from: EngineState, to: EngineState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(all(test, not(feature = "strict-debug")))]
mod tests {
    use super::*;

    #[test]
    fn done_can_resume() {
        assert!(validate_transition(EngineState::Done, EngineState::Growing).is_ok());
    }

    #[test]
    fn nothing_returns_to_uninitialized() {
        use EngineState::*;
        for from in [Uninitialized, Ready, Growing, Done] {
            assert_eq!(
                validate_transition(from, Uninitialized),
                Err(StateMachineError::IllegalTransition { from, to: Uninitialized })
            );
        }
    }
}
