use std::fmt::Debug;

use thiserror::Error;
use tracing::trace;

use crate::{
    diagram::Expand,
    math::{Map, Set},
    Show,
};

mod targets;
pub use targets::{Targets, TargetsIter};

mod dfa;
pub use dfa::Dfa;

mod nfa;
pub use nfa::Nfa;

mod table;

/// States are identified by their name.
pub type StateId = String;

/// Symbols of the alphabet. The empty string is reserved for [`EPSILON`].
pub type Symbol = String;

/// The empty symbol, a transition on it consumes no input. Only nondeterministic automata may
/// use it, and it may be used as a transition key even if it is not listed in the alphabet.
pub const EPSILON: &str = "";

/// Errors that arise when the structure of an automaton violates one of its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The initial state does not belong to the states.
    #[error("initial state `{0}` is not a state of the automaton")]
    UnknownInitialState(StateId),
    /// An accepting state does not belong to the states.
    #[error("accepting state `{0}` is not a state of the automaton")]
    UnknownAcceptingState(StateId),
    /// Transitions are given for something that is not a state.
    #[error("transitions are given for `{0}`, which is not a state of the automaton")]
    UnknownSource(StateId),
    /// A transition leads to something that is not a state.
    #[error("transition from `{state}` on {symbol:?} leads to `{target}`, which is not a state of the automaton")]
    UnknownTarget {
        /// The state the transition leaves.
        state: StateId,
        /// The symbol of the transition.
        symbol: Symbol,
        /// The unknown target.
        target: StateId,
    },
    /// A transition uses a symbol outside of the alphabet.
    #[error("symbol {symbol:?} used by state `{state}` is not part of the alphabet")]
    UnknownSymbol {
        /// The state whose transitions use the symbol.
        state: StateId,
        /// The offending symbol.
        symbol: Symbol,
    },
    /// A deterministic transition does not lead to precisely one state.
    #[error("transition from `{state}` on {symbol:?} must lead to exactly one state, found {found}")]
    NotDeterministic {
        /// The state the transition leaves.
        state: StateId,
        /// The symbol of the transition.
        symbol: Symbol,
        /// The number of targets that were found.
        found: usize,
    },
    /// A deterministic automaton uses the empty symbol.
    #[error("state `{0}` has a transition on the empty symbol, which deterministic automata may not use")]
    EmptySymbol(StateId),
}

/// Abstracts over what a transition leads to. For deterministic automata this is a single
/// [`StateId`], for nondeterministic ones it is a collection of [`Targets`].
pub trait TransitionTarget: Clone + Debug + Eq + Show + Expand {
    /// Whether each transition leads to precisely one state.
    const DETERMINISTIC: bool;
    /// Short name of the kind of automaton, e.g. `DFA`.
    const NAME: &'static str;

    /// Iterates over all states that the transition leads to.
    fn target_states(&self) -> TargetsIter<'_>;
}

/// The structure of a finite automaton: its states, alphabet, transitions, initial state and
/// accepting states. The type parameter `T` determines what a single transition leads to, see
/// [`Dfa`] and [`Nfa`].
///
/// Instances created through [`FiniteAutomaton::new`] or an [`AutomatonBuilder`] are validated.
/// The setters replace a field without validation, the invariants are checked again whenever a
/// diagram is built (see [`crate::diagram::Diagram::assemble`]). Replacing fields is not
/// synchronized, sharing an automaton that is being modified requires external locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiniteAutomaton<T> {
    states: Set<StateId>,
    alphabet: Set<Symbol>,
    transitions: Map<StateId, Map<Symbol, T>>,
    initial_state: StateId,
    accepting_states: Set<StateId>,
}

impl<T: TransitionTarget> FiniteAutomaton<T> {
    /// Creates a new automaton and verifies that its structure is sound.
    pub fn new(
        states: Set<StateId>,
        alphabet: Set<Symbol>,
        transitions: Map<StateId, Map<Symbol, T>>,
        initial_state: StateId,
        accepting_states: Set<StateId>,
    ) -> Result<Self, StructuralError> {
        let automaton = Self::from_parts_unchecked(
            states,
            alphabet,
            transitions,
            initial_state,
            accepting_states,
        );
        automaton.validate()?;
        Ok(automaton)
    }

    /// Creates an [`AutomatonBuilder`] for this kind of automaton.
    pub fn builder() -> AutomatonBuilder<T> {
        AutomatonBuilder::default()
    }

    /// Verifies the structural invariants: the initial state, all accepting states and all
    /// sources and targets of transitions are states, and every symbol that is used belongs to
    /// the alphabet. Deterministic automata may not use [`EPSILON`].
    pub fn validate(&self) -> Result<(), StructuralError> {
        if !self.states.contains(&self.initial_state) {
            return Err(StructuralError::UnknownInitialState(
                self.initial_state.clone(),
            ));
        }
        if let Some(q) = self
            .accepting_states
            .iter()
            .find(|q| !self.states.contains(*q))
        {
            return Err(StructuralError::UnknownAcceptingState(q.clone()));
        }

        for (state, row) in &self.transitions {
            if !self.states.contains(state) {
                return Err(StructuralError::UnknownSource(state.clone()));
            }
            for (symbol, target) in row {
                if symbol == EPSILON {
                    if T::DETERMINISTIC {
                        return Err(StructuralError::EmptySymbol(state.clone()));
                    }
                } else if !self.alphabet.contains(symbol) {
                    return Err(StructuralError::UnknownSymbol {
                        state: state.clone(),
                        symbol: symbol.clone(),
                    });
                }

                if let Some(unknown) = target.target_states().find(|p| !self.states.contains(*p))
                {
                    return Err(StructuralError::UnknownTarget {
                        state: state.clone(),
                        symbol: symbol.clone(),
                        target: unknown.clone(),
                    });
                }
            }
        }

        trace!(
            "validated {} with states {}",
            T::NAME,
            self.states.show()
        );
        Ok(())
    }
}

impl<T> FiniteAutomaton<T> {
    pub(crate) fn from_parts_unchecked(
        states: Set<StateId>,
        alphabet: Set<Symbol>,
        transitions: Map<StateId, Map<Symbol, T>>,
        initial_state: StateId,
        accepting_states: Set<StateId>,
    ) -> Self {
        Self {
            states,
            alphabet,
            transitions,
            initial_state,
            accepting_states,
        }
    }

    /// Returns the set of all states.
    pub fn states(&self) -> &Set<StateId> {
        &self.states
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &Set<Symbol> {
        &self.alphabet
    }

    /// Returns the transitions, grouped by source state and then by symbol.
    pub fn transitions(&self) -> &Map<StateId, Map<Symbol, T>> {
        &self.transitions
    }

    /// Returns the transitions leaving `state`, if there are any.
    pub fn transitions_from(&self, state: &str) -> Option<&Map<Symbol, T>> {
        self.transitions.get(state)
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> &StateId {
        &self.initial_state
    }

    /// Returns the set of accepting states.
    pub fn accepting_states(&self) -> &Set<StateId> {
        &self.accepting_states
    }

    /// Returns true if `state` is accepting.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.contains(state)
    }

    /// Returns true if `state` is the initial state.
    pub fn is_initial(&self, state: &str) -> bool {
        self.initial_state == state
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if some transition is labeled with [`EPSILON`].
    pub fn uses_epsilon(&self) -> bool {
        self.transitions
            .values()
            .any(|row| row.contains_key(EPSILON))
    }

    /// Replaces the set of states.
    pub fn set_states(&mut self, states: Set<StateId>) {
        self.states = states;
    }

    /// Replaces the alphabet.
    pub fn set_alphabet(&mut self, alphabet: Set<Symbol>) {
        self.alphabet = alphabet;
    }

    /// Replaces the transitions.
    pub fn set_transitions(&mut self, transitions: Map<StateId, Map<Symbol, T>>) {
        self.transitions = transitions;
    }

    /// Replaces the initial state.
    pub fn set_initial_state(&mut self, initial_state: StateId) {
        self.initial_state = initial_state;
    }

    /// Replaces the set of accepting states.
    pub fn set_accepting_states(&mut self, accepting_states: Set<StateId>) {
        self.accepting_states = accepting_states;
    }
}

/// Helper for assembling a [`FiniteAutomaton`] step by step.
///
/// ```
/// use automata_viz::prelude::*;
///
/// let dfa = Dfa::builder()
///     .with_states(["q0", "q1"])
///     .with_alphabet(["a"])
///     .with_transitions([("q0", "a", "q1"), ("q1", "a", "q0")])
///     .with_accepting(["q1"])
///     .into_automaton("q0")
///     .unwrap();
/// assert_eq!(dfa.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<T> {
    states: Set<StateId>,
    alphabet: Set<Symbol>,
    transitions: Map<StateId, Map<Symbol, T>>,
    accepting: Set<StateId>,
}

impl<T> Default for AutomatonBuilder<T> {
    fn default() -> Self {
        Self {
            states: Set::new(),
            alphabet: Set::new(),
            transitions: Map::default(),
            accepting: Set::new(),
        }
    }
}

impl<T: TransitionTarget> AutomatonBuilder<T> {
    /// Adds the given states.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds the given symbols to the alphabet.
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.alphabet.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Adds transitions given as `(source, symbol, target)`. A later transition for the same
    /// source and symbol replaces an earlier one.
    pub fn with_transitions<I, S, A, X>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, A, X)>,
        S: Into<StateId>,
        A: Into<Symbol>,
        X: Into<T>,
    {
        for (source, symbol, target) in transitions {
            self.transitions
                .entry(source.into())
                .or_default()
                .insert(symbol.into(), target.into());
        }
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.accepting.extend(states.into_iter().map(Into::into));
        self
    }

    /// Builds and validates the automaton with `initial` as its initial state.
    pub fn into_automaton(
        self,
        initial: impl Into<StateId>,
    ) -> Result<FiniteAutomaton<T>, StructuralError> {
        FiniteAutomaton::new(
            self.states,
            self.alphabet,
            self.transitions,
            initial.into(),
            self.accepting,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{branching_nfa, flip_dfa};

    #[test]
    fn accessors() {
        let dfa = flip_dfa();
        assert_eq!(dfa.size(), 2);
        assert_eq!(dfa.initial_state(), "A");
        assert!(dfa.is_initial("A"));
        assert!(dfa.is_accepting("B"));
        assert!(!dfa.is_accepting("A"));
        assert_eq!(dfa.alphabet().len(), 2);
        assert_eq!(dfa.transitions_from("A").map(|row| row.len()), Some(2));
        assert!(dfa.transitions_from("C").is_none());
        assert!(!dfa.uses_epsilon());
        assert!(branching_nfa().uses_epsilon());
    }

    #[test]
    fn unknown_initial_state() {
        let res = Dfa::builder()
            .with_states(["A"])
            .with_alphabet(["0"])
            .with_transitions([("A", "0", "A")])
            .into_automaton("Z");
        assert_eq!(res, Err(StructuralError::UnknownInitialState("Z".into())));
    }

    #[test]
    fn unknown_accepting_state() {
        let res = Dfa::builder()
            .with_states(["A"])
            .with_accepting(["B"])
            .into_automaton("A");
        assert_eq!(res, Err(StructuralError::UnknownAcceptingState("B".into())));
    }

    #[test]
    fn unknown_source_and_target() {
        let res = Dfa::builder()
            .with_states(["A"])
            .with_alphabet(["0"])
            .with_transitions([("X", "0", "A")])
            .into_automaton("A");
        assert_eq!(res, Err(StructuralError::UnknownSource("X".into())));

        let res = Nfa::builder()
            .with_states(["A", "B"])
            .with_alphabet(["0"])
            .with_transitions([("A", "0", Targets::from(["B", "C"]))])
            .into_automaton("A");
        assert_eq!(
            res,
            Err(StructuralError::UnknownTarget {
                state: "A".into(),
                symbol: "0".into(),
                target: "C".into()
            })
        );
    }

    #[test]
    fn symbols_must_be_in_alphabet() {
        let res = Dfa::builder()
            .with_states(["A"])
            .with_alphabet(["0"])
            .with_transitions([("A", "1", "A")])
            .into_automaton("A");
        assert_eq!(
            res,
            Err(StructuralError::UnknownSymbol {
                state: "A".into(),
                symbol: "1".into()
            })
        );
    }

    #[test]
    fn epsilon_only_for_nondeterministic() {
        let res = Dfa::builder()
            .with_states(["A"])
            .with_alphabet(["0"])
            .with_transitions([("A", EPSILON, "A")])
            .into_automaton("A");
        assert_eq!(res, Err(StructuralError::EmptySymbol("A".into())));

        let nfa = Nfa::builder()
            .with_states(["A"])
            .with_alphabet(["0"])
            .with_transitions([("A", EPSILON, Targets::from("A"))])
            .into_automaton("A");
        assert!(nfa.is_ok());
    }

    #[test]
    fn setters_defer_validation() {
        let mut dfa = flip_dfa();
        dfa.set_initial_state("C".into());
        assert_eq!(dfa.initial_state(), "C");
        assert_eq!(
            dfa.validate(),
            Err(StructuralError::UnknownInitialState("C".into()))
        );

        dfa.set_states(["A", "B", "C"].into_iter().map(String::from).collect());
        assert!(dfa.validate().is_ok());

        dfa.set_accepting_states(Set::new());
        dfa.set_alphabet(["0".to_string()].into());
        assert!(matches!(
            dfa.validate(),
            Err(StructuralError::UnknownSymbol { .. })
        ));

        dfa.set_transitions(Map::default());
        assert!(dfa.validate().is_ok());
        assert!(dfa.transitions().is_empty());
    }
}
