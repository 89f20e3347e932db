//! Library for turning finite automata into diagrams.
//!
//! An automaton is given by its structure: a set of states, an alphabet, a transition relation, one
//! initial state and a set of accepting states. For a deterministic automaton ([`automaton::Dfa`])
//! every transition leads to precisely one state, while a nondeterministic automaton
//! ([`automaton::Nfa`]) maps each state and symbol to a collection of [`automaton::Targets`] that
//! may be empty, a single state or many states. Nondeterministic automata may additionally use the
//! empty symbol [`automaton::EPSILON`] for transitions that consume no input.
//!
//! Turning such a structure into a picture happens in a single pass without any intermediate state:
//! 1. the transition relation is flattened into a sequence of [`diagram::Transition`]s, one for each
//!    source, symbol and individual target (see [`diagram::expand()`]),
//! 2. every state is assigned a [`diagram::Category`] depending on whether it is initial and/or
//!    accepting (see [`diagram::classify()`]),
//! 3. a [`diagram::Diagram`] is assembled, consisting of a synthetic start marker, one node per state
//!    and one edge per transition plus the edge from the start marker to the initial state.
//!
//! The resulting diagram can be turned into the DOT format, which in turn is rendered by graphviz
//! when the `graphviz` feature is enabled. The [`visual::VisualAutomaton`] wrapper bundles an
//! automaton with its [`diagram::LayoutOptions`] and provides the whole pipeline in one call.
//!
//! Automata are usually obtained from a JSON [`description::Description`], which is interpreted as
//! a deterministic automaton if possible and as a nondeterministic one otherwise.
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_viz::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "graphviz")]
    pub use super::diagram::{Export, RenderError};
    pub use super::{
        automaton::{
            AutomatonBuilder, Dfa, FiniteAutomaton, Nfa, StateId, StructuralError, Symbol,
            Targets, TransitionTarget, EPSILON,
        },
        description::{load, AnyAutomaton, Description, InterpretationError, LoadError},
        diagram::{
            classify, expand, Category, Diagram, Edge, Endpoint, Expand, LayoutOptions, Node,
            Transition, EPSILON_LABEL,
        },
        math,
        visual::{VisualAutomaton, VisualDfa, VisualNfa},
        Show,
    };
}

/// Type aliases for the collections that are used throughout the crate.
pub mod math;

/// Structural model of finite automata together with validation of their invariants.
pub mod automaton;

/// Translation of automata into diagrams and the DOT format.
pub mod diagram;

/// Loading automata from JSON descriptions.
pub mod description;

/// Bundles an automaton with layout options.
pub mod visual;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`. For a state that is simply its name,
    /// for a transition `(q0, a, q1)` it is `(q0, a, q1)`. This is mainly used for logging and
    /// for the transition table.
    fn show(&self) -> String;
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!(
            "[{}]",
            itertools::Itertools::join(&mut self.iter().map(|x| x.show()), ", ")
        )
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for std::collections::BTreeSet<S> {
    fn show(&self) -> String {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut self.iter().map(|x| x.show()), ", ")
        )
    }
}
