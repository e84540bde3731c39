//! Configuration schema definitions and the generic block decoder.
//!
//! The types here mirror the document one to one: every repeated block is a
//! `Vec`, so the [`validation`](super::validation) pass can see how many
//! `server`, `http` or `action` blocks were actually written. Decoding walks a
//! [`GenericNode`] by exact (hyphenated) field name. The `pipe` block is left
//! empty here because its label carries data; see [`super::pipe`].

use serde::Serialize;
use thiserror::Error;

use crate::config::node::{GenericNode, Mapping, NodeKind};

/// Error raised when the document tree does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A key holds a node of the wrong kind.
    #[error("'{key}': expected {expected}, found {found}")]
    UnexpectedKind {
        key: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// An integer field does not hold a base-10 integer.
    #[error("'{key}': '{value}' is not a base-10 integer")]
    InvalidInt { key: String, value: String },

    /// A `pipe` block contains an option outside version/alias/module.
    #[error("unknown pipe key '{key}' in pipe '{import_path}'")]
    UnknownPipeKey { import_path: String, key: String },
}

impl DecodeError {
    /// The offending key, as a dotted path for schema fields.
    pub fn key(&self) -> &str {
        match self {
            DecodeError::UnexpectedKind { key, .. } => key,
            DecodeError::InvalidInt { key, .. } => key,
            DecodeError::UnknownPipeKey { key, .. } => key,
        }
    }
}

/// Root configuration, as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Host to handler bindings.
    #[serde(rename = "host")]
    pub hosts: Vec<HostConfig>,

    /// Plugins to build and load, keyed by import path.
    #[serde(rename = "pipe")]
    pub pipes: Vec<PipeConfig>,

    /// Server blocks. At most one survives validation.
    #[serde(rename = "server")]
    pub servers: Vec<ServerConfig>,
}

impl Config {
    /// The server block, if one was written.
    pub fn server(&self) -> Option<&ServerConfig> {
        self.servers.first()
    }
}

/// Maps a request host to a pipe handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostConfig {
    pub endpoint: String,
    pub handler: String,
}

/// A plugin source. `import_path` comes from the block label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipeConfig {
    pub import_path: String,
    pub version: String,
    pub alias: String,
    pub module: String,
}

/// Server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Duration literal such as `10s`. Empty means wait forever.
    pub graceful_shutdown: String,

    pub http: Vec<HttpConfig>,

    pub action: Vec<ActionConfig>,
}

impl ServerConfig {
    pub fn http(&self) -> Option<&HttpConfig> {
        self.http.first()
    }

    pub fn action(&self) -> Option<&ActionConfig> {
        self.action.first()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpConfig {
    pub port: i64,
}

/// Handlers invoked for unmatched hosts and recovered panics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActionConfig {
    pub not_found: String,
    pub panic: String,
}

/// A block type that can be decoded from one mapping of a block list.
pub(crate) trait DecodeBlock: Sized {
    fn decode_block(fields: &Fields<'_>) -> Result<Self, DecodeError>;
}

/// Field accessor over one block body.
///
/// Absent keys decode to the zero value. Keys not asked for are ignored.
pub(crate) struct Fields<'a> {
    path: String,
    mapping: &'a Mapping,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(path: impl Into<String>, mapping: &'a Mapping) -> Self {
        Self {
            path: path.into(),
            mapping,
        }
    }

    fn key_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Read a scalar as a string.
    pub(crate) fn string(&self, key: &str) -> Result<String, DecodeError> {
        match self.mapping.get(key) {
            None => Ok(String::new()),
            Some(node) => expect_scalar(&self.key_path(key), node).map(str::to_string),
        }
    }

    /// Read a scalar as a base-10 integer.
    pub(crate) fn int(&self, key: &str) -> Result<i64, DecodeError> {
        let Some(node) = self.mapping.get(key) else {
            return Ok(0);
        };
        let key_path = self.key_path(key);
        let literal = expect_scalar(&key_path, node)?;
        literal.trim().parse::<i64>().map_err(|_| DecodeError::InvalidInt {
            key: key_path,
            value: literal.to_string(),
        })
    }

    /// Decode every occurrence of a repeated block.
    pub(crate) fn blocks<T: DecodeBlock>(&self, key: &str) -> Result<Vec<T>, DecodeError> {
        let Some(node) = self.mapping.get(key) else {
            return Ok(Vec::new());
        };
        let key_path = self.key_path(key);
        let list = expect_mapping_list(&key_path, node)?;
        list.iter()
            .enumerate()
            .map(|(i, mapping)| {
                T::decode_block(&Fields::new(format!("{}[{}]", key_path, i), mapping))
            })
            .collect()
    }
}

pub(crate) fn expect_scalar<'n>(key: &str, node: &'n GenericNode) -> Result<&'n str, DecodeError> {
    match node {
        GenericNode::Scalar(value) => Ok(value.as_str()),
        other => Err(unexpected(key, NodeKind::Scalar, other)),
    }
}

pub(crate) fn expect_mapping_list<'n>(
    key: &str,
    node: &'n GenericNode,
) -> Result<&'n [Mapping], DecodeError> {
    match node {
        GenericNode::MappingList(list) => Ok(list.as_slice()),
        other => Err(unexpected(key, NodeKind::MappingList, other)),
    }
}

fn unexpected(key: &str, expected: NodeKind, found: &GenericNode) -> DecodeError {
    DecodeError::UnexpectedKind {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

impl DecodeBlock for HostConfig {
    fn decode_block(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            endpoint: fields.string("endpoint")?,
            handler: fields.string("handler")?,
        })
    }
}

impl DecodeBlock for ServerConfig {
    fn decode_block(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            graceful_shutdown: fields.string("graceful-shutdown")?,
            http: fields.blocks("http")?,
            action: fields.blocks("action")?,
        })
    }
}

impl DecodeBlock for HttpConfig {
    fn decode_block(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            port: fields.int("port")?,
        })
    }
}

impl DecodeBlock for ActionConfig {
    fn decode_block(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            not_found: fields.string("not-found")?,
            panic: fields.string("panic")?,
        })
    }
}

const TOP_LEVEL_KEYS: [&str; 3] = ["host", "pipe", "server"];

/// Decode the document root into a [`Config`] with `pipes` left empty.
pub fn decode_schema(root: &GenericNode) -> Result<Config, DecodeError> {
    let mapping = match root {
        GenericNode::Mapping(mapping) => mapping,
        other => return Err(unexpected("<root>", NodeKind::Mapping, other)),
    };

    for key in mapping.keys().filter(|k| !TOP_LEVEL_KEYS.contains(&k.as_str())) {
        tracing::debug!(key = %key, "Ignoring unrecognized top-level key");
    }

    let fields = Fields::new("", mapping);
    Ok(Config {
        hosts: fields.blocks("host")?,
        pipes: Vec::new(),
        servers: fields.blocks("server")?,
    })
}
