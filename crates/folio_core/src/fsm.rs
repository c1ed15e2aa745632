//! State Machine Runtime
//!
//! Small flat state machines used for view state (active branch, overlay).
//! Transitions are keyed by `(state, event)`; unmatched events are ignored.

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to). A later transition for the same
    /// state and event replaces the earlier one.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.insert((from, event), to);
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Send an event to the state machine, potentially triggering a transition.
    ///
    /// Returns the state after the event; unmatched events leave the state as is.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;
        match self.transitions.get(&(current, event)) {
            Some(&to_state) => {
                tracing::trace!(from = ?current, event = ?event, to = ?to_state, "transition");
                self.current_state = to_state;
                to_state
            }
            None => {
                tracing::trace!(state = ?current, event = ?event, "no transition");
                current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Overlay {
        Closed,
        Open,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Toggle {
        Open,
        Close,
    }

    fn overlay() -> StateMachine<Overlay, Toggle> {
        StateMachine::builder(Overlay::Closed)
            .on(Overlay::Closed, Toggle::Open, Overlay::Open)
            .on(Overlay::Open, Toggle::Close, Overlay::Closed)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = overlay();

        assert_eq!(fsm.current_state(), Overlay::Closed);
        assert_eq!(fsm.send(Toggle::Open), Overlay::Open);
        assert!(fsm.is_in(Overlay::Open));
        assert_eq!(fsm.send(Toggle::Close), Overlay::Closed);
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = overlay();

        assert_eq!(fsm.send(Toggle::Close), Overlay::Closed);
        fsm.send(Toggle::Open);
        assert_eq!(fsm.send(Toggle::Open), Overlay::Open);
    }

    #[test]
    fn test_later_transition_replaces_earlier() {
        let mut fsm = StateMachine::builder(0u8)
            .on(0, Toggle::Open, 1)
            .on(0, Toggle::Open, 2)
            .build();

        assert_eq!(fsm.send(Toggle::Open), 2);
    }
}
