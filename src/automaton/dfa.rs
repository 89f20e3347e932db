use crate::diagram::{Expand, Transition};

use super::{FiniteAutomaton, StateId, Symbol, TargetsIter, TransitionTarget};

/// A deterministic finite automaton (DFA), where every transition leads to precisely one state.
/// The transition function may be partial, missing entries are simply not drawn.
pub type Dfa = FiniteAutomaton<StateId>;

impl TransitionTarget for StateId {
    const DETERMINISTIC: bool = true;
    const NAME: &'static str = "DFA";

    fn target_states(&self) -> TargetsIter<'_> {
        TargetsIter::One(Some(self).into_iter())
    }
}

impl Expand for StateId {
    fn expand_into(&self, source: &StateId, symbol: &Symbol, out: &mut Vec<Transition>) {
        out.push(Transition::new(source, self, symbol));
    }
}

impl Dfa {
    /// Returns the state reached from `state` on `symbol`, if that transition is defined.
    pub fn successor(&self, state: &str, symbol: &str) -> Option<&StateId> {
        self.transitions_from(state)?.get(symbol)
    }

    /// Returns true if there is a transition for every state and every symbol of the alphabet.
    pub fn is_total(&self) -> bool {
        self.states().iter().all(|q| {
            self.alphabet()
                .iter()
                .all(|a| self.successor(q, a).is_some())
        })
    }
}
