//! Transition guards
//!
//! Pure rule evaluation: given a definition, the current state and an action
//! id, decide which state the instance lands on or why it cannot move.
//! Checks run in a fixed order (existence before permission), so the error
//! reported for a given input is always the same.

use crate::workflow::{Action, State, WorkflowDefinition};

use super::EngineError;

/// Evaluate the transition guards for `action_id` from `current_state_id`
///
/// Returns the target state when every guard passes.
pub fn evaluate_transition<'d>(
    definition: &'d WorkflowDefinition,
    current_state_id: &str,
    action_id: &str,
) -> Result<&'d State, EngineError> {
    let current = definition
        .state(current_state_id)
        .filter(|s| !s.is_final)
        .ok_or_else(|| EngineError::InvalidOrTerminalState {
            state_id: current_state_id.to_string(),
        })?;

    let action = definition
        .action(action_id)
        .ok_or_else(|| EngineError::ActionNotFound(action_id.to_string()))?;

    check_action(definition, current, action)
}

/// Actions that would currently succeed from `current_state_id`, in
/// declaration order. Empty for undeclared or final states.
pub fn available_actions<'d>(
    definition: &'d WorkflowDefinition,
    current_state_id: &str,
) -> Vec<&'d Action> {
    let Some(current) = definition.state(current_state_id).filter(|s| !s.is_final) else {
        return vec![];
    };

    definition
        .actions
        .iter()
        .filter(|action| check_action(definition, current, action).is_ok())
        .collect()
}

fn check_action<'d>(
    definition: &'d WorkflowDefinition,
    current: &State,
    action: &Action,
) -> Result<&'d State, EngineError> {
    if !action.enabled {
        return Err(EngineError::ActionDisabled(action.id.clone()));
    }

    if !action.allows_from(&current.id) {
        return Err(EngineError::ActionNotAllowedFromState {
            action_id: action.id.clone(),
            state_id: current.id.clone(),
        });
    }

    definition
        .state(&action.to_state)
        .filter(|s| s.enabled)
        .ok_or_else(|| EngineError::InvalidTargetState(action.to_state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d1() -> WorkflowDefinition {
        WorkflowDefinition::new("d1")
            .with_state(State::new("a").initial())
            .with_state(State::new("b"))
            .with_state(State::new("c").terminal())
            .with_state(State::new("off").disabled())
            .with_action(Action::new("go", ["a"], "b"))
            .with_action(Action::new("finish", ["b"], "c"))
            .with_action(Action::new("paused", ["a"], "b").disabled())
            .with_action(Action::new("x", ["a"], "z"))
            .with_action(Action::new("sleep", ["a"], "off"))
    }

    #[test]
    fn test_valid_transition() {
        let def = d1();
        let target = evaluate_transition(&def, "a", "go").unwrap();
        assert_eq!(target.id, "b");
    }

    #[test]
    fn test_final_state_blocks_everything() {
        let def = d1();
        for action in ["go", "finish", "nope", "x"] {
            assert_eq!(
                evaluate_transition(&def, "c", action),
                Err(EngineError::InvalidOrTerminalState {
                    state_id: "c".to_string()
                })
            );
        }
    }

    #[test]
    fn test_unknown_current_state() {
        let def = d1();
        assert!(matches!(
            evaluate_transition(&def, "ghost", "go"),
            Err(EngineError::InvalidOrTerminalState { .. })
        ));
    }

    #[test]
    fn test_guard_order() {
        let def = d1();
        assert_eq!(
            evaluate_transition(&def, "a", "nope"),
            Err(EngineError::ActionNotFound("nope".to_string()))
        );
        // Disabled wins over wrong source state
        assert_eq!(
            evaluate_transition(&def, "b", "paused"),
            Err(EngineError::ActionDisabled("paused".to_string()))
        );
        assert_eq!(
            evaluate_transition(&def, "a", "finish"),
            Err(EngineError::ActionNotAllowedFromState {
                action_id: "finish".to_string(),
                state_id: "a".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_targets() {
        let def = d1();
        assert_eq!(
            evaluate_transition(&def, "a", "x"),
            Err(EngineError::InvalidTargetState("z".to_string()))
        );
        assert_eq!(
            evaluate_transition(&def, "a", "sleep"),
            Err(EngineError::InvalidTargetState("off".to_string()))
        );
    }

    #[test]
    fn test_available_actions() {
        let def = d1();
        let ids: Vec<_> = available_actions(&def, "a").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["go"]);

        let ids: Vec<_> = available_actions(&def, "b").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["finish"]);

        assert!(available_actions(&def, "c").is_empty());
        assert!(available_actions(&def, "ghost").is_empty());
    }
}
