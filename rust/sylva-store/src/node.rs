//! Node identity and materialized path types.

use std::fmt;
use std::sync::Arc;

use sylva_common::{Result, error::Error};

/// Opaque identifier of a node's identity, as recorded by an index.
///
/// A raw key says nothing about the node's content or location; it must be
/// resolved against a document revision to obtain a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    pub const fn new(key: u64) -> NodeKey {
        NodeKey(key)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeKey {
    fn from(key: u64) -> NodeKey {
        NodeKey(key)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A materialized root-to-node path: the sequence of step names leading
/// from the document root to a node.
///
/// The document root itself is the empty segment sequence, displayed as
/// `/`. Segments are reference-counted so paths clone cheaply as they move
/// through index entries and resolved nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<Arc<str>>,
}

impl NodePath {
    /// The root path (no segments).
    pub fn root() -> NodePath {
        NodePath {
            segments: Vec::new(),
        }
    }

    /// Parses a `/a/b/c` style path. `/` parses to the root path.
    ///
    /// Segments must be non-empty and must not contain whitespace; the
    /// leading slash is mandatory.
    pub fn parse(text: &str) -> Result<NodePath> {
        let Some(rest) = text.strip_prefix('/') else {
            return Err(Error::invalid_arg(
                "path",
                format!("node path must start with '/': '{text}'"),
            ));
        };
        if rest.is_empty() {
            return Ok(NodePath::root());
        }
        let mut segments = Vec::new();
        for segment in rest.split('/') {
            if segment.is_empty() {
                return Err(Error::invalid_arg(
                    "path",
                    format!("node path contains an empty step: '{text}'"),
                ));
            }
            if segment.chars().any(char::is_whitespace) {
                return Err(Error::invalid_arg(
                    "path",
                    format!("node path step contains whitespace: '{text}'"),
                ));
            }
            segments.push(Arc::from(segment));
        }
        Ok(NodePath { segments })
    }

    /// Returns a new path with `name` appended as a child step.
    pub fn child(&self, name: impl AsRef<str>) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(Arc::from(name.as_ref()));
        NodePath { segments }
    }

    pub fn segments(&self) -> &[Arc<str>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// A fully materialized node, resolved from a raw index key within a
/// specific document revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    key: NodeKey,
    path: NodePath,
    revision: u64,
    value: Option<String>,
}

impl Node {
    pub fn new(key: NodeKey, path: NodePath, revision: u64, value: Option<String>) -> Node {
        Node {
            key,
            path,
            revision,
            value,
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The node's text value, if it carries one.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
