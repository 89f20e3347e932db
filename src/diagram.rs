use tracing::debug;

use crate::automaton::{FiniteAutomaton, StateId, StructuralError, TransitionTarget};

/// Flattening of the transition relation into individual transitions.
pub mod expand;
pub use expand::{display_symbol, expand, Expand, Transition, EPSILON_LABEL};

/// Categorization of states by whether they are initial and/or accepting.
pub mod classify;
pub use classify::{classify, Category};

mod dot;
pub use dot::{DotStateAttribute, DotTransitionAttribute, LayoutOptions};

#[cfg(feature = "graphviz")]
mod render;
#[cfg(feature = "graphviz")]
pub use render::{display_png, Export, RenderError};

/// A node of a [`Diagram`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// The synthetic start marker, an invisible point from which the edge to the initial state
    /// originates. It is not a state of the automaton.
    Start,
    /// A state of the automaton.
    State {
        /// The name of the state, which is also used as its label.
        id: StateId,
        /// Determines the shape of the node.
        category: Category,
    },
}

impl Node {
    /// Returns the state this node represents, `None` for the start marker.
    pub fn state(&self) -> Option<&StateId> {
        match self {
            Node::Start => None,
            Node::State { id, .. } => Some(id),
        }
    }

    /// Returns the category of the state, `None` for the start marker.
    pub fn category(&self) -> Option<Category> {
        match self {
            Node::Start => None,
            Node::State { category, .. } => Some(*category),
        }
    }
}

/// The origin of an [`Edge`], which is either the start marker or a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The start marker.
    Start,
    /// A state of the automaton.
    State(StateId),
}

/// A directed edge of a [`Diagram`]. Edges always lead to a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Where the edge originates.
    pub from: Endpoint,
    /// The state the edge leads to.
    pub to: StateId,
    /// The text drawn on the edge, the edge from the start marker has none.
    pub label: Option<String>,
}

/// Abstract directed graph that depicts an automaton. It is built fresh from the automaton every
/// time and holds an ordered list of nodes and an ordered list of edges:
/// - the start marker comes first, followed by one node per state in sorted order,
/// - the unlabeled edge from the start marker to the initial state comes first, followed by one
///   edge per [`Transition`] in the order in which [`expand()`] produces them.
///
/// Parallel edges are kept, even if they coincide in origin, target and label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    name: &'static str,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Builds the diagram of `automaton`. The structure of the automaton is validated first, so
    /// an invalid automaton never yields a partial diagram.
    pub fn assemble<T: TransitionTarget>(
        automaton: &FiniteAutomaton<T>,
    ) -> Result<Self, StructuralError> {
        automaton.validate()?;

        let diagram = Self::from_parts(
            T::NAME,
            automaton.initial_state(),
            classify(automaton),
            expand(automaton),
        );
        debug!(
            "assembled {} diagram with {} nodes and {} edges",
            T::NAME,
            diagram.nodes.len(),
            diagram.edges.len()
        );
        Ok(diagram)
    }

    /// Assembles a diagram from already classified states and expanded transitions. The states
    /// are drawn in the given order.
    pub fn from_parts<'a, S, I>(
        name: &'static str,
        initial: &StateId,
        states: S,
        transitions: I,
    ) -> Self
    where
        S: IntoIterator<Item = (&'a StateId, Category)>,
        I: IntoIterator<Item = Transition>,
    {
        let nodes = std::iter::once(Node::Start)
            .chain(states.into_iter().map(|(id, category)| Node::State {
                id: id.clone(),
                category,
            }))
            .collect();

        let edges = std::iter::once(Edge {
            from: Endpoint::Start,
            to: initial.clone(),
            label: None,
        })
        .chain(transitions.into_iter().map(|t| Edge {
            label: Some(t.label().to_string()),
            from: Endpoint::State(t.source),
            to: t.target,
        }))
        .collect();

        Self { name, nodes, edges }
    }

    /// The kind of automaton that is depicted, e.g. `DFA`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All nodes, starting with [`Node::Start`].
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, starting with the edge from the start marker.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterates over the nodes that represent states together with their category.
    pub fn state_nodes(&self) -> impl Iterator<Item = (&StateId, Category)> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Start => None,
            Node::State { id, category } => Some((id, *category)),
        })
    }

    /// Returns the category of the node drawn for `state`.
    pub fn category_of(&self, state: &str) -> Option<Category> {
        self.state_nodes()
            .find(|(id, _)| *id == state)
            .map(|(_, category)| category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        prelude::*,
        tests::{branching_nfa, flip_dfa},
    };

    fn edge(from: &str, to: &str, label: &str) -> Edge {
        Edge {
            from: Endpoint::State(from.into()),
            to: to.into(),
            label: Some(label.into()),
        }
    }

    fn start_edge(to: &str) -> Edge {
        Edge {
            from: Endpoint::Start,
            to: to.into(),
            label: None,
        }
    }

    #[test_log::test]
    fn flip_dfa_diagram() {
        let diagram = Diagram::assemble(&flip_dfa()).unwrap();
        assert_eq!(diagram.name(), "DFA");
        assert_eq!(
            diagram.nodes(),
            &[
                Node::Start,
                Node::State {
                    id: "A".into(),
                    category: Category::Initial
                },
                Node::State {
                    id: "B".into(),
                    category: Category::Accepting
                },
            ]
        );
        assert_eq!(
            diagram.edges(),
            &[
                start_edge("A"),
                edge("A", "A", "0"),
                edge("A", "B", "1"),
                edge("B", "B", "0"),
                edge("B", "A", "1"),
            ]
        );
    }

    #[test_log::test]
    fn branching_nfa_diagram() {
        let nfa = branching_nfa();
        let diagram = Diagram::assemble(&nfa).unwrap();
        assert_eq!(diagram.name(), "NFA");
        assert_eq!(diagram.nodes().len(), nfa.size() + 1);
        assert_eq!(
            diagram.edges(),
            &[start_edge("A"), edge("A", "A", "a"), edge("A", "B", "a")]
        );
        assert_eq!(diagram.category_of("B"), Some(Category::Accepting));
        assert_eq!(diagram.category_of("C"), None);
    }

    #[test]
    fn counts() {
        for automaton in [Nfa::from(flip_dfa()), branching_nfa()] {
            let diagram = Diagram::assemble(&automaton).unwrap();
            assert_eq!(diagram.nodes().len(), automaton.size() + 1);
            assert_eq!(diagram.edges().len(), 1 + expand(&automaton).len());
            assert_eq!(
                diagram
                    .nodes()
                    .iter()
                    .filter(|n| matches!(n, Node::Start))
                    .count(),
                1
            );
        }
    }

    #[test]
    fn states_are_sorted_and_isolated_states_drawn() {
        let dfa = Dfa::builder()
            .with_states(["z", "m", "a"])
            .with_alphabet(["0"])
            .with_transitions([("z", "0", "a")])
            .into_automaton("z")
            .unwrap();
        let diagram = Diagram::assemble(&dfa).unwrap();
        let states: Vec<_> = diagram.state_nodes().map(|(q, _)| q.as_str()).collect();
        assert_eq!(states, vec!["a", "m", "z"]);
        assert_eq!(diagram.nodes()[3].state().map(String::as_str), Some("z"));
        assert_eq!(diagram.nodes()[3].category(), Some(Category::Initial));
        assert_eq!(diagram.nodes()[0].state(), None);
    }

    #[test]
    fn parallel_edges_are_kept() {
        let initial = "p".to_string();
        let states = vec![(&initial, Category::Initial)];
        let transitions = vec![
            Transition::new("p", "p", "a"),
            Transition::new("p", "p", "a"),
            Transition::new("p", "p", "b"),
        ];
        let diagram = Diagram::from_parts("NFA", &initial, states, transitions);
        assert_eq!(diagram.edges().len(), 4);
        assert_eq!(diagram.edges()[1], diagram.edges()[2]);
    }

    #[test]
    fn epsilon_edges_get_display_label() {
        let nfa = Nfa::builder()
            .with_states(["p", "q"])
            .with_transitions([("p", EPSILON, Targets::from("q"))])
            .into_automaton("p")
            .unwrap();
        let diagram = Diagram::assemble(&nfa).unwrap();
        assert_eq!(diagram.edges()[1], edge("p", "q", EPSILON_LABEL));
    }

    #[test]
    fn invalid_automaton_yields_no_diagram() {
        let mut dfa = flip_dfa();
        dfa.set_accepting_states(["C".to_string()].into());
        assert_eq!(
            Diagram::assemble(&dfa),
            Err(StructuralError::UnknownAcceptingState("C".into()))
        );
    }

    #[test]
    fn reproducible() {
        let dfa = flip_dfa();
        assert_eq!(
            Diagram::assemble(&dfa).unwrap(),
            Diagram::assemble(&dfa).unwrap()
        );
    }
}
