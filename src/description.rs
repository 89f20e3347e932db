use std::{io::Read, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    automaton::{Dfa, FiniteAutomaton, Nfa, StateId, StructuralError, Symbol, Targets},
    diagram::{Diagram, LayoutOptions},
    math::Map,
    visual::{VisualDfa, VisualNfa},
};

/// Raised when a description fits neither a deterministic nor a nondeterministic automaton. The
/// reason why the nondeterministic interpretation failed is the [`std::error::Error::source`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("the input is neither a DFA nor an NFA (as a DFA: {deterministic})")]
pub struct InterpretationError {
    /// Why the description is not a deterministic automaton.
    pub deterministic: StructuralError,
    /// Why the description is not a nondeterministic automaton.
    #[source]
    pub nondeterministic: StructuralError,
}

/// Errors that occur while loading an automaton from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read automaton description: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a well formed description.
    #[error("malformed automaton description: {0}")]
    Json(#[from] serde_json::Error),
    /// The description is neither a DFA nor an NFA.
    #[error(transparent)]
    Interpretation(#[from] InterpretationError),
}

/// Serialized structure of an automaton, as it is read from JSON.
///
/// ```json
/// {
///   "states": ["q0", "q1"],
///   "input_symbols": ["a", "b"],
///   "transitions": { "q0": { "a": "q1", "b": ["q0", "q1"] }, "q1": { "": [] } },
///   "initial_state": "q0",
///   "final_states": ["q1"]
/// }
/// ```
///
/// A transition is either a single state or a list of states. The order of the keys in
/// `transitions` determines the order in which edges are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// All states.
    pub states: Vec<StateId>,
    /// The alphabet.
    #[serde(rename = "input_symbols")]
    pub alphabet: Vec<Symbol>,
    /// Transitions grouped by source state and symbol.
    pub transitions: Map<StateId, Map<Symbol, Targets>>,
    /// The initial state.
    pub initial_state: StateId,
    /// The accepting states.
    #[serde(rename = "final_states")]
    pub accepting_states: Vec<StateId>,
}

impl FromStr for Description {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl Description {
    /// Decodes a description from a reader that yields JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Attempts to read the description as a deterministic automaton. This fails if some
    /// transition does not lead to precisely one state, or if the structure is unsound.
    pub fn as_dfa(&self) -> Result<Dfa, StructuralError> {
        let mut transitions: Map<StateId, Map<Symbol, StateId>> = Map::default();
        for (state, row) in &self.transitions {
            let mut det_row = Map::default();
            for (symbol, targets) in row {
                let Targets::One(target) = targets else {
                    return Err(StructuralError::NotDeterministic {
                        state: state.clone(),
                        symbol: symbol.clone(),
                        found: targets.len(),
                    });
                };
                det_row.insert(symbol.clone(), target.clone());
            }
            transitions.insert(state.clone(), det_row);
        }
        self.build(transitions)
    }

    /// Attempts to read the description as a nondeterministic automaton.
    pub fn as_nfa(&self) -> Result<Nfa, StructuralError> {
        self.build(self.transitions.clone())
    }

    fn build<T>(
        &self,
        transitions: Map<StateId, Map<Symbol, T>>,
    ) -> Result<FiniteAutomaton<T>, StructuralError>
    where
        T: crate::automaton::TransitionTarget,
    {
        FiniteAutomaton::new(
            self.states.iter().cloned().collect(),
            self.alphabet.iter().cloned().collect(),
            transitions,
            self.initial_state.clone(),
            self.accepting_states.iter().cloned().collect(),
        )
    }

    /// Interprets the description as a deterministic automaton if possible, otherwise as a
    /// nondeterministic one. If neither works, both reasons are reported.
    pub fn interpret(&self) -> Result<AnyAutomaton, InterpretationError> {
        let deterministic = match self.as_dfa() {
            Ok(dfa) => {
                info!("interpreted input as DFA with {} states", dfa.size());
                return Ok(AnyAutomaton::Deterministic(dfa));
            }
            Err(e) => e,
        };
        debug!("input is not a DFA: {deterministic}");

        match self.as_nfa() {
            Ok(nfa) => {
                info!("interpreted input as NFA with {} states", nfa.size());
                Ok(AnyAutomaton::Nondeterministic(nfa))
            }
            Err(nondeterministic) => Err(InterpretationError {
                deterministic,
                nondeterministic,
            }),
        }
    }
}

/// Reads the JSON description in the file at `path` and interprets it, see
/// [`Description::interpret`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<AnyAutomaton, LoadError> {
    let path = path.as_ref();
    debug!("reading automaton description from {}", path.display());
    let file = std::fs::File::open(path)?;
    let description = Description::from_reader(std::io::BufReader::new(file))?;
    Ok(description.interpret()?)
}

/// Either a deterministic or a nondeterministic automaton, the result of interpreting a
/// [`Description`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyAutomaton {
    /// A deterministic automaton.
    Deterministic(Dfa),
    /// A nondeterministic automaton.
    Nondeterministic(Nfa),
}

impl AnyAutomaton {
    /// Short name of the kind of automaton.
    pub fn kind(&self) -> &'static str {
        match self {
            AnyAutomaton::Deterministic(_) => "DFA",
            AnyAutomaton::Nondeterministic(_) => "NFA",
        }
    }

    /// Builds the diagram of the automaton.
    pub fn diagram(&self) -> Result<Diagram, StructuralError> {
        match self {
            AnyAutomaton::Deterministic(dfa) => Diagram::assemble(dfa),
            AnyAutomaton::Nondeterministic(nfa) => Diagram::assemble(nfa),
        }
    }

    /// Returns the transition table of the automaton.
    pub fn transition_table(&self) -> String {
        match self {
            AnyAutomaton::Deterministic(dfa) => dfa.transition_table(),
            AnyAutomaton::Nondeterministic(nfa) => nfa.transition_table(),
        }
    }

    /// Wraps the automaton for visualization with the given layout.
    pub fn visualize(self, layout: LayoutOptions) -> Visual {
        match self {
            AnyAutomaton::Deterministic(dfa) => {
                Visual::Deterministic(VisualDfa::new(dfa).with_layout(layout))
            }
            AnyAutomaton::Nondeterministic(nfa) => {
                Visual::Nondeterministic(VisualNfa::new(nfa).with_layout(layout))
            }
        }
    }
}

/// A [`VisualDfa`] or a [`VisualNfa`], obtained from [`AnyAutomaton::visualize`].
#[derive(Debug, Clone)]
pub enum Visual {
    /// Visualizes a deterministic automaton.
    Deterministic(VisualDfa),
    /// Visualizes a nondeterministic automaton.
    Nondeterministic(VisualNfa),
}

impl Visual {
    /// Builds the diagram, see [`crate::visual::VisualAutomaton::diagram`].
    pub fn diagram(&self) -> Result<Diagram, StructuralError> {
        match self {
            Visual::Deterministic(v) => v.diagram(),
            Visual::Nondeterministic(v) => v.diagram(),
        }
    }

    /// Computes the DOT representation using the layout of the wrapped automaton.
    pub fn dot_representation(&self) -> Result<String, StructuralError> {
        match self {
            Visual::Deterministic(v) => v.dot_representation(),
            Visual::Nondeterministic(v) => v.dot_representation(),
        }
    }

    /// Exports the diagram if `export` is given and displays it afterwards.
    #[cfg(feature = "graphviz")]
    pub fn show_diagram(
        &self,
        export: Option<&crate::diagram::Export>,
    ) -> Result<Diagram, crate::diagram::RenderError> {
        match self {
            Visual::Deterministic(v) => v.show_diagram(export),
            Visual::Nondeterministic(v) => v.show_diagram(export),
        }
    }

    /// Renders the diagram into the file described by `export`.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file(
        &self,
        export: &crate::diagram::Export,
    ) -> Result<std::path::PathBuf, crate::diagram::RenderError> {
        match self {
            Visual::Deterministic(v) => v.render_to_file(export),
            Visual::Nondeterministic(v) => v.render_to_file(export),
        }
    }
}
