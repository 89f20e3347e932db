use std::borrow::Cow;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{math::Set, Show};

use super::StateId;

/// The states a nondeterministic transition leads to.
///
/// When decoding JSON, a string becomes [`Targets::One`] and an array becomes a
/// [`Targets::Sequence`]. An unordered [`Targets::Set`] can only be created from a [`Set`]. A
/// collection with a single member behaves exactly like [`Targets::One`] for that member, see
/// [`Targets::normalized`].
///
/// Targets form a set: a state listed more than once in a [`Targets::Sequence`] is only
/// reported at its first position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    /// Precisely one target.
    One(StateId),
    /// An ordered sequence of targets, which may be empty.
    Sequence(Vec<StateId>),
    /// An unordered collection of targets, which may be empty.
    Set(Set<StateId>),
}

impl Targets {
    /// No targets at all, a transition to nowhere.
    pub fn empty() -> Self {
        Targets::Sequence(vec![])
    }

    /// The number of distinct targets.
    pub fn len(&self) -> usize {
        match self {
            Targets::One(_) => 1,
            Targets::Sequence(seq) => seq.iter().unique().count(),
            Targets::Set(set) => set.len(),
        }
    }

    /// Returns true if there is no target.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the distinct targets. Sets are iterated in sorted order, sequences in the
    /// order in which each state first occurs.
    pub fn iter(&self) -> TargetsIter<'_> {
        match self {
            Targets::One(q) => TargetsIter::One(Some(q).into_iter()),
            Targets::Sequence(seq) => TargetsIter::Sequence(seq.iter().unique()),
            Targets::Set(set) => TargetsIter::Set(set.iter()),
        }
    }

    /// Unwraps a collection with a single member into [`Targets::One`]. Every other value is
    /// returned as is.
    pub fn normalized(&self) -> Cow<'_, Targets> {
        match self {
            Targets::Sequence(_) | Targets::Set(_) if self.len() == 1 => match self.iter().next()
            {
                Some(sole) => Cow::Owned(Targets::One(sole.clone())),
                None => Cow::Borrowed(self),
            },
            _ => Cow::Borrowed(self),
        }
    }

    /// Returns the sole target if there is precisely one.
    pub fn sole(&self) -> Option<&StateId> {
        match self.iter().exactly_one() {
            Ok(q) => Some(q),
            Err(_) => None,
        }
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a StateId;
    type IntoIter = TargetsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the states in a [`Targets`] collection.
#[derive(Debug, Clone)]
pub enum TargetsIter<'a> {
    /// Iterates over a single state.
    One(std::option::IntoIter<&'a StateId>),
    /// Iterates over a sequence of states, skipping repetitions.
    Sequence(itertools::Unique<std::slice::Iter<'a, StateId>>),
    /// Iterates over a set of states.
    Set(std::collections::btree_set::Iter<'a, StateId>),
}

impl<'a> Iterator for TargetsIter<'a> {
    type Item = &'a StateId;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            TargetsIter::One(it) => it.next(),
            TargetsIter::Sequence(it) => it.next(),
            TargetsIter::Set(it) => it.next(),
        }
    }
}

impl Show for Targets {
    fn show(&self) -> String {
        match self {
            Targets::One(q) => q.clone(),
            _ if self.is_empty() => "∅".to_string(),
            _ => format!("{{{}}}", self.iter().join(", ")),
        }
    }
}

impl From<StateId> for Targets {
    fn from(value: StateId) -> Self {
        Targets::One(value)
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        Targets::One(value.to_string())
    }
}

impl From<Vec<StateId>> for Targets {
    fn from(value: Vec<StateId>) -> Self {
        Targets::Sequence(value)
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(value: [&str; N]) -> Self {
        Targets::Sequence(value.into_iter().map(String::from).collect())
    }
}

impl From<Set<StateId>> for Targets {
    fn from(value: Set<StateId>) -> Self {
        Targets::Set(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_unwraps_single_members() {
        let set = Targets::from(Set::from(["q1".to_string()]));
        let seq = Targets::from(["q1"]);
        assert_eq!(*set.normalized(), Targets::One("q1".into()));
        assert_eq!(set.normalized(), seq.normalized());

        let many = Targets::from(["q1", "q0"]);
        assert!(matches!(many.normalized(), Cow::Borrowed(_)));
        assert!(matches!(Targets::empty().normalized(), Cow::Borrowed(_)));
    }

    #[test]
    fn repeated_members_count_once() {
        let repeated = Targets::from(["q1", "q1"]);
        assert_eq!(repeated.len(), 1);
        assert_eq!(repeated.sole().map(String::as_str), Some("q1"));
        assert_eq!(*repeated.normalized(), Targets::One("q1".into()));

        let mixed = Targets::from(["q2", "q0", "q2", "q1", "q0"]);
        assert_eq!(mixed.len(), 3);
        assert_eq!(mixed.iter().collect::<Vec<_>>(), vec!["q2", "q0", "q1"]);
        assert_eq!(mixed.show(), "{q2, q0, q1}");
    }

    #[test]
    fn iteration_order() {
        let seq = Targets::from(["q2", "q0", "q1"]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec!["q2", "q0", "q1"]);

        let set = Targets::from(Set::from(["q2".to_string(), "q0".to_string()]));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["q0", "q2"]);
        assert_eq!(set.sole(), None);
        assert_eq!(Targets::from("q0").sole().map(String::as_str), Some("q0"));
    }

    #[test]
    fn decode_from_json() {
        let one: Targets = serde_json::from_str("\"q0\"").unwrap();
        assert_eq!(one, Targets::One("q0".into()));
        let many: Targets = serde_json::from_str("[\"q0\", \"q1\"]").unwrap();
        assert_eq!(many, Targets::from(["q0", "q1"]));
        let none: Targets = serde_json::from_str("[]").unwrap();
        assert!(none.is_empty());
        assert!(serde_json::from_str::<Targets>("12").is_err());
    }

    #[test]
    fn show_targets() {
        assert_eq!(Targets::from("q0").show(), "q0");
        assert_eq!(Targets::empty().show(), "∅");
        assert_eq!(Targets::from(["q1", "q0"]).show(), "{q1, q0}");
    }
}
