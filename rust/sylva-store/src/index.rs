//! Index metadata: kinds, definitions and the per-document catalog.
//!
//! Definitions are immutable and owned by the document's catalog; the
//! scanning machinery only ever reads them. Building and maintaining the
//! index entries themselves is the storage layer's concern.

use sylva_common::{Result, error::Error};

use crate::node::{NodeKey, NodePath};

/// The kinds of indexes a document catalog can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Maps node materialized paths to node identities.
    Path,
    /// Maps node names to node identities.
    Name,
    /// Maps typed node values to node identities.
    Value,
}

impl IndexKind {
    pub const fn name(&self) -> &'static str {
        match self {
            IndexKind::Path => "path",
            IndexKind::Name => "name",
            IndexKind::Value => "value",
        }
    }
}

impl TryFrom<&str> for IndexKind {
    type Error = sylva_common::error::Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "path" => Ok(IndexKind::Path),
            "name" => Ok(IndexKind::Name),
            "value" => Ok(IndexKind::Value),
            _ => Err(Error::invalid_arg(
                "name",
                format!("Unrecognized index kind: {name}"),
            )),
        }
    }
}

/// An immutable index definition: a number unique within the document's
/// catalog for its kind, the kind itself, and the path expressions the
/// index was declared over.
///
/// The declared paths are carried for catalog introspection; the scan
/// filters on the paths *recorded in the index entries*, not on the
/// declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    index_no: u32,
    kind: IndexKind,
    paths: Vec<String>,
}

impl IndexDef {
    pub fn new(
        index_no: u32,
        kind: IndexKind,
        paths: impl IntoIterator<Item = impl Into<String>>,
    ) -> IndexDef {
        IndexDef {
            index_no,
            kind,
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn index_no(&self) -> u32 {
        self.index_no
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

/// One persisted index entry: every node key recorded under one
/// materialized path, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: NodePath,
    pub keys: Vec<NodeKey>,
}

/// The read-only set of index definitions attached to a document.
#[derive(Debug, Clone, Default)]
pub struct IndexCatalog {
    defs: Vec<IndexDef>,
}

impl IndexCatalog {
    pub fn new(defs: impl IntoIterator<Item = IndexDef>) -> IndexCatalog {
        IndexCatalog {
            defs: defs.into_iter().collect(),
        }
    }

    /// Returns the definition registered under `index_no`, if any.
    pub fn get(&self, index_no: u32) -> Option<&IndexDef> {
        self.defs.iter().find(|def| def.index_no == index_no)
    }

    /// Returns the definition registered under `index_no`, verifying it has
    /// the required kind.
    ///
    /// An absent number is `IndexNotFound`; a present definition of another
    /// kind is `InvalidIndexType`; a mismatch is reported, never coerced.
    /// `collection` and `document` stamp the error with its origin.
    pub fn require(
        &self,
        index_no: u32,
        kind: IndexKind,
        collection: &str,
        document: &str,
    ) -> Result<&IndexDef> {
        let def = self
            .get(index_no)
            .ok_or_else(|| Error::index_not_found(index_no, collection, document))?;
        if def.kind != kind {
            return Err(Error::invalid_index_type(
                index_no,
                collection,
                document,
                kind.name(),
                def.kind.name(),
            ));
        }
        Ok(def)
    }

    pub fn defs(&self) -> &[IndexDef] {
        &self.defs
    }
}
