//! *Document Store* abstraction: named collections of versioned,
//! tree-structured documents, together with the storage-level seams the
//! index scanning machinery consumes (page transactions, index page
//! cursors, node materialization).

pub mod index;
pub mod memory;
pub mod node;
pub mod resolve;
pub mod stats;

use std::sync::Arc;

use sylva_common::Result;

use crate::index::{IndexCatalog, IndexDef, IndexEntry};
use crate::node::{Node, NodeKey};

/// The `DocumentStore` trait represents the collection/document registry.
/// It resolves collection names to live collection handles.
pub trait DocumentStore: Send + Sync {
    /// Looks up a collection by name.
    ///
    /// Returns `ErrorKind::CollectionNotFound` when no collection with the
    /// given name exists.
    fn lookup(&self, collection: &str) -> Result<Arc<dyn Collection>>;
}

/// A named grouping of documents in the store.
pub trait Collection: Send + Sync + std::fmt::Debug {
    /// The collection's name.
    fn name(&self) -> &str;

    /// Opens a cursor over the collection's documents in natural
    /// (insertion) order.
    ///
    /// The caller owns the cursor and must `close` it; implementations also
    /// release on drop so no exit path leaks.
    fn open_documents(&self) -> Result<Box<dyn DocumentCursor>>;
}

/// A forward cursor over the documents of a collection.
pub trait DocumentCursor {
    /// Returns the next document handle, or `None` once exhausted.
    fn next(&mut self) -> Result<Option<Arc<dyn DocumentHandle>>>;

    /// Releases the cursor. Idempotent.
    fn close(&mut self);
}

/// A transactional handle bound to one document revision.
///
/// Handles are shared (borrowed via `Arc`) by consumers such as index
/// scans; the scan never closes the handle or its transaction.
pub trait DocumentHandle: Send + Sync + std::fmt::Debug {
    /// Name of the collection this document belongs to.
    fn collection_name(&self) -> &str;

    /// The document's resource name, unique enough to resolve by
    /// first-match iteration (see [`resolve::resolve_document`]).
    fn document_name(&self) -> &str;

    /// The revision this handle is bound to.
    fn revision(&self) -> u64;

    /// The document's index catalog (read-only).
    fn index_catalog(&self) -> &IndexCatalog;

    /// The page-transaction accessor for reading persisted index pages
    /// within this revision.
    fn page_transaction(&self) -> Arc<dyn PageTransaction>;

    /// Materializes the node referenced by `key` within this revision.
    ///
    /// Returns `Ok(None)` when the key does not reference a live node in
    /// this revision; it is the caller's decision whether that is an error.
    fn materialize(&self, key: NodeKey) -> Result<Option<Node>>;
}

/// Storage-level handle for reading persisted pages within a specific
/// document revision.
pub trait PageTransaction: Send + Sync {
    /// Opens a forward cursor over the persisted entries of the index
    /// described by `def`, in the index's stable order.
    ///
    /// This is the index-open primitive: implementations may touch index
    /// pages here, so callers that promise laziness must defer this call
    /// until the first pull.
    fn open_index(&self, def: &IndexDef) -> Result<Box<dyn IndexPageCursor>>;
}

/// A forward cursor over persisted index entries, streamed page by page.
pub trait IndexPageCursor {
    /// Returns the next index entry, or `None` once the index is exhausted.
    fn next_entry(&mut self) -> Result<Option<IndexEntry>>;

    /// Releases any page resources held by the cursor. Idempotent; safe to
    /// call on an exhausted cursor.
    fn close(&mut self);
}
