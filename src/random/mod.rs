use tracing::debug;

use crate::{
    automaton::{Dfa, FiniteAutomaton, Nfa, StateId, Symbol, Targets, EPSILON},
    math::{Map, Set},
};

fn state_name(i: usize) -> StateId {
    format!("q{i}")
}

/// The first 26 symbols are the lowercase letters, after that symbols are numbered.
fn symbol_name(i: usize) -> Symbol {
    match u8::try_from(i) {
        Ok(i) if i < 26 => char::from(b'a' + i).to_string(),
        _ => format!("s{i}"),
    }
}

fn states_and_alphabet(states: usize, symbols: usize) -> (Vec<StateId>, Vec<Symbol>) {
    (
        (0..states.max(1)).map(state_name).collect(),
        (0..symbols).map(symbol_name).collect(),
    )
}

/// Generates a random [`Dfa`] with `states` states (at least one) over `symbols` symbols. The
/// transition function is total, every target is drawn uniformly and every state is accepting
/// with probability one half. The initial state is `q0`. The same `seed` always produces the
/// same automaton.
pub fn random_dfa(states: usize, symbols: usize, seed: u64) -> Dfa {
    let mut rng = fastrand::Rng::with_seed(seed);
    let (names, alphabet) = states_and_alphabet(states, symbols);

    let mut transitions: Map<StateId, Map<Symbol, StateId>> = Map::default();
    for q in &names {
        let row = alphabet
            .iter()
            .map(|a| (a.clone(), names[rng.usize(..names.len())].clone()))
            .collect();
        transitions.insert(q.clone(), row);
    }
    let accepting: Set<StateId> = names.iter().filter(|_| rng.bool()).cloned().collect();

    debug!("generated random DFA with {} states", names.len());
    FiniteAutomaton::from_parts_unchecked(
        names.iter().cloned().collect(),
        alphabet.into_iter().collect(),
        transitions,
        state_name(0),
        accepting,
    )
}

/// Generates a random [`Nfa`] with `states` states (at least one) over `symbols` symbols. For
/// every state and every symbol, and additionally for [`EPSILON`], each state is a target with
/// probability `density`. Entries without targets are kept as empty collections. The initial
/// state is `q0`.
pub fn random_nfa(states: usize, symbols: usize, density: f64, seed: u64) -> Nfa {
    let mut rng = fastrand::Rng::with_seed(seed);
    let (names, alphabet) = states_and_alphabet(states, symbols);

    let mut transitions: Map<StateId, Map<Symbol, Targets>> = Map::default();
    for q in &names {
        let mut row = Map::default();
        for a in alphabet.iter().map(String::as_str).chain([EPSILON]) {
            let targets: Vec<StateId> = names
                .iter()
                .filter(|_| rng.f64() < density)
                .cloned()
                .collect();
            row.insert(a.to_string(), Targets::Sequence(targets));
        }
        transitions.insert(q.clone(), row);
    }
    let accepting: Set<StateId> = names.iter().filter(|_| rng.bool()).cloned().collect();

    debug!("generated random NFA with {} states", names.len());
    FiniteAutomaton::from_parts_unchecked(
        names.iter().cloned().collect(),
        alphabet.into_iter().collect(),
        transitions,
        state_name(0),
        accepting,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn symbol_names() {
        assert_eq!(symbol_name(0), "a");
        assert_eq!(symbol_name(25), "z");
        assert_eq!(symbol_name(26), "s26");
        assert_eq!(symbol_name(300), "s300");
    }

    #[test]
    fn random_automata_are_valid_and_reproducible() {
        for seed in 0..16 {
            let dfa = random_dfa(7, 3, seed);
            assert!(dfa.validate().is_ok());
            assert!(dfa.is_total());
            assert_eq!(dfa, random_dfa(7, 3, seed));

            let nfa = random_nfa(5, 2, 0.4, seed);
            assert!(nfa.validate().is_ok());
            assert_eq!(nfa, random_nfa(5, 2, 0.4, seed));
        }
    }

    #[test_log::test]
    fn total_dfas_expand_to_states_times_symbols() {
        for seed in 0..32 {
            let dfa = random_dfa(1 + (seed as usize % 9), 1 + (seed as usize % 4), seed);
            let transitions = expand(&dfa);
            assert_eq!(transitions.len(), dfa.size() * dfa.alphabet().len());

            let diagram = Diagram::assemble(&dfa).unwrap();
            assert_eq!(diagram.nodes().len(), dfa.size() + 1);
            assert_eq!(diagram.edges().len(), transitions.len() + 1);
        }
    }

    #[test_log::test]
    fn nfa_expansion_counts_targets() {
        for seed in 0..32 {
            let nfa = random_nfa(6, 2, 0.3, seed);
            let expected: usize = nfa
                .transitions()
                .values()
                .flat_map(|row| row.values())
                .map(Targets::len)
                .sum();
            let transitions = expand(&nfa);
            assert_eq!(transitions.len(), expected);

            for (q, row) in nfa.transitions() {
                for (a, targets) in row {
                    let produced = transitions
                        .iter()
                        .filter(|t| &t.source == q && &t.symbol == a)
                        .count();
                    assert_eq!(produced, targets.len());
                }
            }

            let epsilon = transitions.iter().filter(|t| t.is_epsilon());
            assert!(epsilon.clone().all(|t| t.label() == EPSILON_LABEL));
        }
    }

    #[test]
    fn classification_is_total() {
        let dfa = random_dfa(12, 2, 7);
        let diagram = Diagram::assemble(&dfa).unwrap();
        for q in dfa.states() {
            let category = diagram.category_of(q).unwrap();
            assert_eq!(category.is_accepting(), dfa.is_accepting(q));
            assert_eq!(category.is_initial(), dfa.is_initial(q));
        }
    }
}
