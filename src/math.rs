use std::collections::BTreeSet;

/// Type alias for sets. These are ordered so that iterating over states or symbols always yields
/// the same sequence, which keeps diagrams reproducible.
pub type Set<S> = BTreeSet<S>;

/// Type alias for maps. Iteration follows insertion order, so transitions keep the order in which
/// they were given.
pub type Map<K, V> = indexmap::IndexMap<K, V>;
