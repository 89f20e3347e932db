use tracing::trace;

use crate::{
    automaton::{FiniteAutomaton, StateId, Symbol, EPSILON},
    Show,
};

/// Label that is drawn for transitions on the empty symbol.
pub const EPSILON_LABEL: &str = "λ";

/// Returns the text that is drawn for `symbol`. This is the symbol itself, except for
/// [`EPSILON`] which is drawn as [`EPSILON_LABEL`].
pub fn display_symbol(symbol: &str) -> &str {
    if symbol == EPSILON {
        EPSILON_LABEL
    } else {
        symbol
    }
}

/// A single transition from `source` to `target` on `symbol`, the unit from which edges are
/// drawn. Nondeterministic transitions with several targets are split into one [`Transition`]
/// per target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    /// The state the transition leaves.
    pub source: StateId,
    /// The state the transition leads to.
    pub target: StateId,
    /// The symbol as it appears in the automaton, possibly [`EPSILON`].
    pub symbol: Symbol,
}

impl Transition {
    /// Creates a new transition.
    pub fn new(source: &str, target: &str, symbol: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// The text that is drawn on the edge for this transition, see [`display_symbol`].
    pub fn label(&self) -> &str {
        display_symbol(&self.symbol)
    }

    /// Returns true if this is a transition on the empty symbol.
    pub fn is_epsilon(&self) -> bool {
        self.symbol == EPSILON
    }
}

impl Show for Transition {
    fn show(&self) -> String {
        format!("({}, {}, {})", self.source, self.label(), self.target)
    }
}

/// Implemented by everything a transition can lead to, turns one entry of the transition relation
/// into individual [`Transition`]s.
pub trait Expand {
    /// Appends the transitions that leave `source` on `symbol` and lead to `self` to `out`.
    fn expand_into(&self, source: &StateId, symbol: &Symbol, out: &mut Vec<Transition>);
}

/// Flattens the transition relation of `automaton` into a sequence of [`Transition`]s. States are
/// visited in the order in which their transitions were given and so are the symbols of each
/// state, which makes the result reproducible.
pub fn expand<T: Expand>(automaton: &FiniteAutomaton<T>) -> Vec<Transition> {
    let mut out = Vec::new();
    for (state, row) in automaton.transitions() {
        for (symbol, target) in row {
            target.expand_into(state, symbol, &mut out);
        }
    }
    trace!("expanded transitions {}", out.show());
    out
}
