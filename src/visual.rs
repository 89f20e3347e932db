use std::ops::{Deref, DerefMut};

use crate::{
    automaton::{FiniteAutomaton, StateId, StructuralError, Targets, TransitionTarget},
    diagram::{Diagram, LayoutOptions},
};

/// Wraps an automaton together with the [`LayoutOptions`] that are used for drawing it. The
/// fields of the automaton can be read and replaced through [`Deref`]/[`DerefMut`], which allows
/// reusing one instance for several automata. Changes are validated when the next diagram is
/// built.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualAutomaton<T> {
    automaton: FiniteAutomaton<T>,
    layout: LayoutOptions,
}

/// Visualizes a [`crate::automaton::Dfa`].
pub type VisualDfa = VisualAutomaton<StateId>;
/// Visualizes a [`crate::automaton::Nfa`].
pub type VisualNfa = VisualAutomaton<Targets>;

impl<T> Deref for VisualAutomaton<T> {
    type Target = FiniteAutomaton<T>;

    fn deref(&self) -> &Self::Target {
        &self.automaton
    }
}

impl<T> DerefMut for VisualAutomaton<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.automaton
    }
}

impl<T> From<FiniteAutomaton<T>> for VisualAutomaton<T> {
    fn from(automaton: FiniteAutomaton<T>) -> Self {
        Self {
            automaton,
            layout: LayoutOptions::default(),
        }
    }
}

impl<T: TransitionTarget> VisualAutomaton<T> {
    /// Wraps `automaton` using the default layout.
    pub fn new(automaton: FiniteAutomaton<T>) -> Self {
        automaton.into()
    }

    /// Replaces the layout.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// The wrapped automaton.
    pub fn automaton(&self) -> &FiniteAutomaton<T> {
        &self.automaton
    }

    /// Mutable access to the wrapped automaton.
    pub fn automaton_mut(&mut self) -> &mut FiniteAutomaton<T> {
        &mut self.automaton
    }

    /// Consumes `self` and returns the wrapped automaton.
    pub fn into_inner(self) -> FiniteAutomaton<T> {
        self.automaton
    }

    /// The layout options.
    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Mutable access to the layout options.
    pub fn layout_mut(&mut self) -> &mut LayoutOptions {
        &mut self.layout
    }

    /// Validates the automaton and builds its diagram.
    pub fn diagram(&self) -> Result<Diagram, StructuralError> {
        Diagram::assemble(&self.automaton)
    }

    /// Builds the diagram and returns its DOT representation.
    pub fn dot_representation(&self) -> Result<String, StructuralError> {
        Ok(self.diagram()?.dot_representation(&self.layout))
    }

    /// Renders the diagram into the file described by `export` and returns its path.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file(
        &self,
        export: &crate::diagram::Export,
    ) -> Result<std::path::PathBuf, crate::diagram::RenderError> {
        self.diagram()?.render_to_file(&self.layout, export)
    }

    /// Builds the diagram, writes it to a file if `export` is given and displays it in an image
    /// viewer. Returns the diagram that was shown.
    #[cfg(feature = "graphviz")]
    pub fn show_diagram(
        &self,
        export: Option<&crate::diagram::Export>,
    ) -> Result<Diagram, crate::diagram::RenderError> {
        let diagram = self.diagram()?;
        if let Some(export) = export {
            let path = diagram.render_to_file(&self.layout, export)?;
            tracing::info!("wrote diagram to {}", path.display());
        }
        diagram.display(&self.layout)?;
        Ok(diagram)
    }
}
