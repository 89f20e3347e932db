use owo_colors::OwoColorize;

use crate::diagram::EPSILON_LABEL;

use super::{FiniteAutomaton, TransitionTarget, EPSILON};

impl<T: TransitionTarget> FiniteAutomaton<T> {
    /// Returns a string representation of the transition table. There is one row per state in
    /// sorted order and one column per symbol, plus a column for the empty symbol if it is used.
    /// The initial state is marked with `→` and accepting states with `*`. Missing transitions
    /// are shown as `-`.
    pub fn transition_table(&self) -> String {
        let mut columns: Vec<&str> = self
            .alphabet()
            .iter()
            .map(String::as_str)
            .filter(|a| *a != EPSILON)
            .collect();
        if self.uses_epsilon() || self.alphabet().contains(EPSILON) {
            columns.push(EPSILON);
        }

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(columns.iter().map(|a| {
                if *a == EPSILON {
                    EPSILON_LABEL.to_string()
                } else {
                    a.to_string()
                }
            })),
        );

        for q in self.states() {
            let mut name = String::new();
            name.push_str(if self.is_initial(q) { "→" } else { " " });
            name.push_str(if self.is_accepting(q) { "*" } else { " " });
            name.push_str(q);
            let name = if self.is_accepting(q) {
                name.bold().to_string()
            } else {
                name
            };

            let mut row = vec![name];
            for a in &columns {
                match self.transitions_from(q).and_then(|row| row.get(*a)) {
                    Some(target) => row.push(target.show()),
                    None => row.push("-".to_string()),
                }
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}
