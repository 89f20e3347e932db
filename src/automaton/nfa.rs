use crate::{
    diagram::{Expand, Transition},
    math::Map,
};

use super::{Dfa, FiniteAutomaton, StateId, Symbol, Targets, TargetsIter, TransitionTarget};

/// A nondeterministic finite automaton (NFA). Each transition leads to a possibly empty collection
/// of [`Targets`], and transitions on [`super::EPSILON`] are allowed.
pub type Nfa = FiniteAutomaton<Targets>;

impl TransitionTarget for Targets {
    const DETERMINISTIC: bool = false;
    const NAME: &'static str = "NFA";

    fn target_states(&self) -> TargetsIter<'_> {
        self.iter()
    }
}

impl Expand for Targets {
    /// An empty collection produces nothing, every other collection produces one transition per
    /// member. Single member collections are unwrapped first, so a set and a sequence holding the
    /// same state yield identical transitions.
    fn expand_into(&self, source: &StateId, symbol: &Symbol, out: &mut Vec<Transition>) {
        match self.normalized().as_ref() {
            Targets::One(target) => out.push(Transition::new(source, target, symbol)),
            many => out.extend(
                many.iter()
                    .map(|target| Transition::new(source, target, symbol)),
            ),
        }
    }
}

impl Nfa {
    /// Iterates over the states reached from `state` on `symbol`.
    pub fn successors<'a>(&'a self, state: &str, symbol: &str) -> TargetsIter<'a> {
        match self.transitions_from(state).and_then(|row| row.get(symbol)) {
            Some(targets) => targets.iter(),
            None => TargetsIter::One(None.into_iter()),
        }
    }
}

impl From<Dfa> for Nfa {
    fn from(dfa: Dfa) -> Self {
        let transitions = dfa
            .transitions()
            .iter()
            .map(|(q, row)| {
                (
                    q.clone(),
                    row.iter()
                        .map(|(a, p)| (a.clone(), Targets::One(p.clone())))
                        .collect::<Map<_, _>>(),
                )
            })
            .collect();
        FiniteAutomaton::from_parts_unchecked(
            dfa.states().clone(),
            dfa.alphabet().clone(),
            transitions,
            dfa.initial_state().clone(),
            dfa.accepting_states().clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        prelude::*,
        tests::{branching_nfa, flip_dfa},
    };

    #[test]
    fn successors() {
        let nfa = branching_nfa();
        assert_eq!(nfa.successors("A", "a").collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(nfa.successors("B", EPSILON).count(), 0);
        assert_eq!(nfa.successors("B", "a").count(), 0);
        assert_eq!(nfa.successors("C", "a").count(), 0);
    }

    #[test]
    fn dfa_is_an_nfa() {
        let nfa = Nfa::from(flip_dfa());
        assert!(nfa.validate().is_ok());
        assert_eq!(nfa.successors("A", "1").collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(nfa.accepting_states(), flip_dfa().accepting_states());
    }
}
