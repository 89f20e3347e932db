use crate::automaton::{FiniteAutomaton, StateId};

/// The visual category of a state. It only influences the shape of the node that is drawn for the
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Neither initial nor accepting.
    Plain,
    /// The initial state, which is not accepting.
    Initial,
    /// An accepting state that is not initial.
    Accepting,
    /// The initial state, which is also accepting.
    InitialAndAccepting,
}

impl Category {
    /// Determines the category from whether a state is initial and whether it is accepting.
    pub fn of(initial: bool, accepting: bool) -> Self {
        match (initial, accepting) {
            (true, true) => Category::InitialAndAccepting,
            (true, false) => Category::Initial,
            (false, true) => Category::Accepting,
            (false, false) => Category::Plain,
        }
    }

    /// Returns true for the initial state.
    pub fn is_initial(&self) -> bool {
        matches!(self, Category::Initial | Category::InitialAndAccepting)
    }

    /// Returns true for accepting states.
    pub fn is_accepting(&self) -> bool {
        matches!(self, Category::Accepting | Category::InitialAndAccepting)
    }

    /// The graphviz shape of the node. Accepting states get a double border, the initial state is
    /// only recognizable through the edge from the start marker.
    pub fn shape(&self) -> &'static str {
        if self.is_accepting() {
            "doublecircle"
        } else {
            "circle"
        }
    }
}

/// Assigns a [`Category`] to every state of `automaton`, including states without any
/// transitions. States are returned in sorted order.
pub fn classify<T>(automaton: &FiniteAutomaton<T>) -> Vec<(&StateId, Category)> {
    automaton
        .states()
        .iter()
        .map(|q| {
            (
                q,
                Category::of(automaton.is_initial(q), automaton.is_accepting(q)),
            )
        })
        .collect()
}
