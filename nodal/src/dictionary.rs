use std::collections::HashMap;

use crate::{NodeId, PRIMITIVES, Primitive};

/// What a dictionary word resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Primitive(Primitive),
    /// Makes the node's id the current cell; does not run the node.
    Node(NodeId),
}

/// Process-wide word table. Filled while loading, read-only afterwards.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: HashMap<String, Entry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_primitives() -> Self {
        let mut dictionary = Self::new();
        for desc in PRIMITIVES {
            dictionary.register(desc.name, Entry::Primitive(desc.primitive));
        }
        dictionary
    }

    /// Returns the entry that was replaced, if any.
    pub fn register(&mut self, name: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(name.into(), entry)
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Entry> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_preloaded() {
        let dictionary = Dictionary::with_primitives();
        assert_eq!(dictionary.len(), PRIMITIVES.len());
        assert_eq!(
            dictionary.lookup("add"),
            Some(Entry::Primitive(Primitive::Add))
        );
        assert_eq!(
            dictionary.lookup("self"),
            Some(Entry::Primitive(Primitive::SelfId))
        );
        assert_eq!(dictionary.lookup("nope"), None);
    }

    #[test]
    fn node_entries_carry_their_id() {
        let mut dictionary = Dictionary::with_primitives();
        assert_eq!(dictionary.register("ping", Entry::Node(NodeId(3))), None);
        assert_eq!(dictionary.lookup("ping"), Some(Entry::Node(NodeId(3))));
    }

    #[test]
    fn register_replaces() {
        let mut dictionary = Dictionary::new();
        assert!(dictionary.is_empty());
        dictionary.register("x", Entry::Node(NodeId(1)));
        let old = dictionary.register("x", Entry::Node(NodeId(2)));
        assert_eq!(old, Some(Entry::Node(NodeId(1))));
        assert_eq!(dictionary.lookup("x"), Some(Entry::Node(NodeId(2))));
    }
}
