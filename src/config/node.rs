//! Untyped document tree.
//!
//! The document parser collapses every block into maps and lists, so a
//! block label and a field name look the same at this level. The decoders in
//! [`schema`](super::schema) and [`pipe`](super::pipe) rebuild the typed
//! model from it.

use std::collections::BTreeMap;
use std::fmt;

/// Keys are unique; the sorted map only makes iteration deterministic.
pub type Mapping = BTreeMap<String, GenericNode>;

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericNode {
    /// A literal value. Integers are kept as their base-10 text.
    Scalar(String),
    /// A single block body or the document root.
    Mapping(Mapping),
    /// A repeated block: one mapping per occurrence.
    MappingList(Vec<Mapping>),
}

/// The shape of a node, used in decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Mapping,
    MappingList,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Scalar => write!(f, "scalar"),
            NodeKind::Mapping => write!(f, "mapping"),
            NodeKind::MappingList => write!(f, "list of mappings"),
        }
    }
}

impl GenericNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            GenericNode::Scalar(_) => NodeKind::Scalar,
            GenericNode::Mapping(_) => NodeKind::Mapping,
            GenericNode::MappingList(_) => NodeKind::MappingList,
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        GenericNode::Scalar(value.into())
    }

    /// Build a mapping node from key/value pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, GenericNode)>,
    {
        GenericNode::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Mapping> for GenericNode {
    fn from(mapping: Mapping) -> Self {
        GenericNode::Mapping(mapping)
    }
}

impl From<Vec<Mapping>> for GenericNode {
    fn from(list: Vec<Mapping>) -> Self {
        GenericNode::MappingList(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(GenericNode::scalar("80").kind(), NodeKind::Scalar);
        assert_eq!(GenericNode::MappingList(vec![]).kind(), NodeKind::MappingList);
        assert_eq!(NodeKind::MappingList.to_string(), "list of mappings");
    }

    #[test]
    fn test_mapping_builder() {
        let node = GenericNode::mapping([("port", GenericNode::scalar("80"))]);
        match node {
            GenericNode::Mapping(m) => assert_eq!(m.get("port"), Some(&GenericNode::scalar("80"))),
            other => panic!("unexpected node: {:?}", other),
        }
    }
}
