//! TOML document adapter.
//!
//! Blocks are written as arrays of tables. A labeled block nests a second
//! array of tables under the label, which yields the same tree the decoders
//! expect:
//!
//! ```toml
//! [[pipe]]
//! [[pipe."github.com/pipehub/sample"]]
//! version = "v0.7.0"
//! ```
//!
//! becomes `pipe = [ { "github.com/pipehub/sample" = [ { version = "v0.7.0" } ] } ]`.

use thiserror::Error;
use toml::{Table, Value};

use crate::config::node::{GenericNode, Mapping};

/// Error type for document parsing.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not valid TOML.
    #[error("syntax error: {0}")]
    Syntax(#[from] toml::de::Error),

    /// An array holds plain values, which no block can represent.
    #[error("'{key}': arrays may only contain tables")]
    ScalarArray { key: String },
}

/// Parse document text into a [`GenericNode`] rooted at a mapping.
pub fn parse_document(text: &str) -> Result<GenericNode, DocumentError> {
    let table: Table = text.parse()?;
    Ok(GenericNode::Mapping(convert_table("", table)?))
}

fn convert_table(path: &str, table: Table) -> Result<Mapping, DocumentError> {
    table
        .into_iter()
        .map(|(key, value)| {
            let child = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };
            convert_value(&child, value).map(|node| (key, node))
        })
        .collect()
}

fn convert_value(path: &str, value: Value) -> Result<GenericNode, DocumentError> {
    let node = match value {
        Value::String(s) => GenericNode::Scalar(s),
        Value::Integer(i) => GenericNode::Scalar(i.to_string()),
        Value::Float(f) => GenericNode::Scalar(f.to_string()),
        Value::Boolean(b) => GenericNode::Scalar(b.to_string()),
        Value::Datetime(d) => GenericNode::Scalar(d.to_string()),
        Value::Table(t) => GenericNode::Mapping(convert_table(path, t)?),
        Value::Array(items) => {
            let list = items
                .into_iter()
                .map(|item| match item {
                    Value::Table(t) => convert_table(path, t),
                    _ => Err(DocumentError::ScalarArray {
                        key: path.to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            GenericNode::MappingList(list)
        }
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_block_shape() {
        let node = parse_document(
            r#"
            [[pipe]]
            [[pipe."github.com/pipehub/sample"]]
            version = "v0.7.0"
            alias = "base"
            "#,
        )
        .unwrap();

        let body = Mapping::from([
            ("alias".to_string(), GenericNode::scalar("base")),
            ("version".to_string(), GenericNode::scalar("v0.7.0")),
        ]);
        let expected = GenericNode::mapping([(
            "pipe",
            GenericNode::MappingList(vec![Mapping::from([(
                "github.com/pipehub/sample".to_string(),
                GenericNode::MappingList(vec![body]),
            )])]),
        )]);
        assert_eq!(node, expected);
    }

    #[test]
    fn test_integer_becomes_literal() {
        let node = parse_document("[[http]]\nport = 8080\n").unwrap();
        let GenericNode::Mapping(root) = node else {
            panic!("root is not a mapping");
        };
        let Some(GenericNode::MappingList(list)) = root.get("http") else {
            panic!("http is not a list");
        };
        assert_eq!(list[0].get("port"), Some(&GenericNode::scalar("8080")));
    }

    #[test]
    fn test_scalar_array_rejected() {
        let err = parse_document("[[server]]\nports = [80, 443]\n").unwrap_err();
        match err {
            DocumentError::ScalarArray { key } => assert_eq!(key, "server.ports"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(parse_document("[[host"), Err(DocumentError::Syntax(_))));
    }
}
