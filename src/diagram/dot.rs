#![allow(missing_docs)]

use std::fmt::Display;

use itertools::Itertools;
use tracing::trace;

use crate::{automaton::StateId, math::Map};

use super::{Diagram, Endpoint, Node};

/// Identifier of the start marker in the DOT representation. States use `q0`, `q1`, ... so the
/// two can never collide.
const START_IDENT: &str = "init";

/// Global layout attributes of a rendered diagram. The defaults produce a left-to-right layout
/// on an 8 by 8 inch canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Lay out states from left to right instead of from top to bottom.
    pub horizontal: bool,
    /// Reverse the direction of the layout.
    pub reverse_orientation: bool,
    /// Maximal size of the drawing in inches, as `width,height`.
    pub size: String,
    /// Font size of node and edge labels.
    pub font_size: f64,
    /// Scale of the arrow heads.
    pub arrow_size: f64,
    /// Minimal distance between ranks of states.
    pub rank_separation: f64,
    /// Remove the DOT source after rendering it to a file.
    pub cleanup: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            horizontal: true,
            reverse_orientation: false,
            size: "8,8".to_string(),
            font_size: 14.0,
            arrow_size: 0.85,
            rank_separation: 0.5,
            cleanup: true,
        }
    }
}

impl LayoutOptions {
    /// The graphviz `rankdir` that corresponds to the orientation.
    pub fn rankdir(&self) -> &'static str {
        match (self.horizontal, self.reverse_orientation) {
            (true, false) => "LR",
            (true, true) => "RL",
            (false, false) => "TB",
            (false, true) => "BT",
        }
    }

    fn header_statements(&self) -> impl Iterator<Item = String> {
        [
            format!("size=\"{}\"", escape(&self.size)),
            format!("ranksep=\"{}\"", self.rank_separation),
            format!("rankdir=\"{}\"", self.rankdir()),
        ]
        .into_iter()
    }
}

/// Escapes a string so that it can be used inside a quoted DOT attribute.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chr in text.chars() {
        match chr {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

impl Diagram {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// The start marker is called `init`, the k-th state in sorted order is called `qk`. The
    /// actual names of the states only appear in their labels.
    pub fn dot_representation(&self, layout: &LayoutOptions) -> String {
        let idents: Map<&StateId, String> = self
            .state_nodes()
            .enumerate()
            .map(|(k, (q, _))| (q, format!("q{k}")))
            .collect();
        let ident = |endpoint: &Endpoint| -> String {
            match endpoint {
                Endpoint::Start => START_IDENT.to_string(),
                Endpoint::State(q) => state_ident(&idents, q),
            }
        };

        let header = std::iter::once(format!("digraph {} {{", self.name()))
            .chain(layout.header_statements());

        let nodes = self.nodes().iter().map(|node| {
            let (ident, attributes) = match node {
                Node::Start => (
                    START_IDENT.to_string(),
                    vec![
                        DotStateAttribute::Label(String::new()),
                        DotStateAttribute::Shape("point".into()),
                        DotStateAttribute::FontSize(layout.font_size),
                    ],
                ),
                Node::State { id, category } => (
                    state_ident(&idents, id),
                    vec![
                        DotStateAttribute::Label(id.clone()),
                        DotStateAttribute::Shape(category.shape().into()),
                        DotStateAttribute::FontSize(layout.font_size),
                    ],
                ),
            };
            format!("{} [{}]", ident, attributes.iter().join(", "))
        });

        let edges = self.edges().iter().map(|edge| {
            let attributes = match &edge.label {
                None => vec![DotTransitionAttribute::ArrowSize(layout.arrow_size)],
                Some(label) => vec![
                    DotTransitionAttribute::Label(format!(" {label} ")),
                    DotTransitionAttribute::ArrowSize(layout.arrow_size),
                    DotTransitionAttribute::FontSize(layout.font_size),
                ],
            };
            format!(
                "{} -> {} [{}]",
                ident(&edge.from),
                state_ident(&idents, &edge.to),
                attributes.iter().join(", ")
            )
        });

        let dot = header
            .chain(nodes)
            .chain(edges)
            .chain(std::iter::once("}".to_string()))
            .join("\n");
        trace!("produced DOT representation\n{}", dot);
        dot
    }
}

/// Edges only lead to states that have a node, the fallback keeps the output well formed for
/// diagrams assembled by hand from inconsistent parts.
fn state_ident(idents: &Map<&StateId, String>, q: &StateId) -> String {
    match idents.get(q) {
        Some(ident) => ident.clone(),
        None => format!("\"{}\"", escape(q)),
    }
}

/// Enum that abstracts attributes of nodes in the DOT format.
#[derive(Debug, Clone, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
    /// The font size of the label
    FontSize(f64),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{}\"", s),
            DotStateAttribute::FontSize(s) => write!(f, "fontsize=\"{}\"", s),
        }
    }
}

/// Enum that abstracts attributes of edges in the DOT format.
#[derive(Debug, Clone, PartialEq)]
pub enum DotTransitionAttribute {
    Label(String),
    ArrowSize(f64),
    FontSize(f64),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{}\"", escape(lbl)),
            DotTransitionAttribute::ArrowSize(s) => write!(f, "arrowsize=\"{s}\""),
            DotTransitionAttribute::FontSize(s) => write!(f, "fontsize=\"{s}\""),
        }
    }
}
