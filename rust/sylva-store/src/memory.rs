//! In-memory reference implementation of the store seams.
//!
//! `MemoryStore` plays the role a filesystem- or service-backed registry
//! plays in production: collections hold documents in insertion order, each
//! document carries its index catalog, its nodes, and pre-built path-index
//! entries split into fixed-size pages so cursors genuinely page through
//! them. The store shares a [`StoreStats`] instance across all handles it
//! issues, which is how tests observe laziness and release.

use std::collections::HashMap;
use std::sync::Arc;

use sylva_common::{Result, error::Error};

use crate::index::{IndexCatalog, IndexDef, IndexEntry};
use crate::node::{Node, NodeKey, NodePath};
use crate::stats::StoreStats;
use crate::{
    Collection, DocumentCursor, DocumentHandle, DocumentStore, IndexPageCursor, PageTransaction,
};

/// Default number of index entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Assembles a [`MemoryStore`] from collection fixtures.
pub struct MemoryStoreBuilder {
    page_size: usize,
    collections: Vec<CollectionFixture>,
}

impl MemoryStoreBuilder {
    pub fn new() -> MemoryStoreBuilder {
        MemoryStoreBuilder {
            page_size: DEFAULT_PAGE_SIZE,
            collections: Vec::new(),
        }
    }

    /// Number of index entries stored per page. Must be at least 1.
    pub fn page_size(mut self, page_size: usize) -> MemoryStoreBuilder {
        self.page_size = page_size;
        self
    }

    pub fn collection(mut self, collection: CollectionFixture) -> MemoryStoreBuilder {
        self.collections.push(collection);
        self
    }

    pub fn build(self) -> Result<MemoryStore> {
        sylva_common::verify_arg!(page_size, self.page_size >= 1);
        let stats = Arc::new(StoreStats::new());
        let mut collections = Vec::with_capacity(self.collections.len());
        for fixture in self.collections {
            let mut documents = Vec::with_capacity(fixture.documents.len());
            for doc in fixture.documents {
                documents.push(Arc::new(doc.build(&fixture.name, self.page_size, &stats)?));
            }
            collections.push(Arc::new(MemoryCollection {
                name: fixture.name,
                documents,
                stats: Arc::clone(&stats),
            }));
        }
        Ok(MemoryStore { collections, stats })
    }
}

impl Default for MemoryStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Declarative description of one collection and its documents.
pub struct CollectionFixture {
    name: String,
    documents: Vec<DocumentFixture>,
}

impl CollectionFixture {
    pub fn new(name: impl Into<String>) -> CollectionFixture {
        CollectionFixture {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    pub fn document(mut self, document: DocumentFixture) -> CollectionFixture {
        self.documents.push(document);
        self
    }
}

/// Declarative description of one document: its nodes, index catalog and
/// persisted index entries. Paths are validated when the store is built.
pub struct DocumentFixture {
    name: String,
    revision: u64,
    indexes: Vec<IndexDef>,
    nodes: Vec<(u64, String, Option<String>)>,
    entries: Vec<(u32, String, Vec<u64>)>,
}

impl DocumentFixture {
    pub fn new(name: impl Into<String>) -> DocumentFixture {
        DocumentFixture {
            name: name.into(),
            revision: 1,
            indexes: Vec::new(),
            nodes: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn revision(mut self, revision: u64) -> DocumentFixture {
        self.revision = revision;
        self
    }

    pub fn index(mut self, def: IndexDef) -> DocumentFixture {
        self.indexes.push(def);
        self
    }

    pub fn node(self, key: u64, path: impl Into<String>) -> DocumentFixture {
        self.node_with_value(key, path, None::<String>)
    }

    pub fn node_with_value(
        mut self,
        key: u64,
        path: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> DocumentFixture {
        self.nodes.push((key, path.into(), value.map(Into::into)));
        self
    }

    /// Declares one persisted entry of index `index_no`: the node keys
    /// recorded under `path`, in index order. Keys need not reference
    /// declared nodes; a dangling key is a legitimate fixture for a stale
    /// index entry.
    pub fn index_entry(
        mut self,
        index_no: u32,
        path: impl Into<String>,
        keys: impl IntoIterator<Item = u64>,
    ) -> DocumentFixture {
        self.entries
            .push((index_no, path.into(), keys.into_iter().collect()));
        self
    }

    fn build(
        self,
        collection_name: &str,
        page_size: usize,
        stats: &Arc<StoreStats>,
    ) -> Result<MemoryDocument> {
        let mut nodes = HashMap::new();
        for (key, path, value) in self.nodes {
            let path = NodePath::parse(&path)?;
            nodes.insert(
                NodeKey::new(key),
                Node::new(NodeKey::new(key), path, self.revision, value),
            );
        }

        let catalog = IndexCatalog::new(self.indexes);
        let mut entries_by_index: HashMap<u32, Vec<IndexEntry>> = HashMap::new();
        for (index_no, path, keys) in self.entries {
            if catalog.get(index_no).is_none() {
                return Err(Error::invalid_arg(
                    "index_entry",
                    format!(
                        "entry declared for undeclared index no {index_no} of document '{}'",
                        self.name
                    ),
                ));
            }
            entries_by_index.entry(index_no).or_default().push(IndexEntry {
                path: NodePath::parse(&path)?,
                keys: keys.into_iter().map(NodeKey::new).collect(),
            });
        }

        let pages = entries_by_index
            .into_iter()
            .map(|(index_no, entries)| {
                let pages: Vec<Vec<IndexEntry>> = entries
                    .chunks(page_size)
                    .map(<[IndexEntry]>::to_vec)
                    .collect();
                (index_no, Arc::new(pages))
            })
            .collect();

        let trx = Arc::new(MemoryPageTransaction {
            document: self.name.clone(),
            pages,
            stats: Arc::clone(stats),
        });

        Ok(MemoryDocument {
            collection_name: collection_name.to_string(),
            name: self.name,
            revision: self.revision,
            catalog,
            nodes,
            trx,
        })
    }
}

/// In-memory document store.
#[derive(Debug)]
pub struct MemoryStore {
    collections: Vec<Arc<MemoryCollection>>,
    stats: Arc<StoreStats>,
}

impl MemoryStore {
    /// The counters shared by every handle this store has issued.
    pub fn stats(&self) -> &Arc<StoreStats> {
        &self.stats
    }
}

impl DocumentStore for MemoryStore {
    fn lookup(&self, collection: &str) -> Result<Arc<dyn Collection>> {
        self.collections
            .iter()
            .find(|col| col.name == collection)
            .map(|col| Arc::clone(col) as Arc<dyn Collection>)
            .ok_or_else(|| Error::collection_not_found(collection))
    }
}

#[derive(Debug)]
struct MemoryCollection {
    name: String,
    documents: Vec<Arc<MemoryDocument>>,
    stats: Arc<StoreStats>,
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_documents(&self) -> Result<Box<dyn DocumentCursor>> {
        self.stats.record_document_cursor_open();
        Ok(Box::new(MemoryDocumentCursor {
            documents: self.documents.clone(),
            next: 0,
            stats: Arc::clone(&self.stats),
            closed: false,
        }))
    }
}

struct MemoryDocumentCursor {
    documents: Vec<Arc<MemoryDocument>>,
    next: usize,
    stats: Arc<StoreStats>,
    closed: bool,
}

impl DocumentCursor for MemoryDocumentCursor {
    fn next(&mut self) -> Result<Option<Arc<dyn DocumentHandle>>> {
        if self.closed || self.next >= self.documents.len() {
            return Ok(None);
        }
        let doc = Arc::clone(&self.documents[self.next]);
        self.next += 1;
        Ok(Some(doc))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.stats.record_document_cursor_close();
        }
    }
}

impl Drop for MemoryDocumentCursor {
    fn drop(&mut self) {
        self.close();
    }
}

#[derive(Debug)]
struct MemoryDocument {
    collection_name: String,
    name: String,
    revision: u64,
    catalog: IndexCatalog,
    nodes: HashMap<NodeKey, Node>,
    trx: Arc<MemoryPageTransaction>,
}

impl DocumentHandle for MemoryDocument {
    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn document_name(&self) -> &str {
        &self.name
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn index_catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    fn page_transaction(&self) -> Arc<dyn PageTransaction> {
        Arc::clone(&self.trx) as Arc<dyn PageTransaction>
    }

    fn materialize(&self, key: NodeKey) -> Result<Option<Node>> {
        Ok(self.nodes.get(&key).cloned())
    }
}

#[derive(Debug)]
struct MemoryPageTransaction {
    document: String,
    pages: HashMap<u32, Arc<Vec<Vec<IndexEntry>>>>,
    stats: Arc<StoreStats>,
}

impl PageTransaction for MemoryPageTransaction {
    fn open_index(&self, def: &IndexDef) -> Result<Box<dyn IndexPageCursor>> {
        let pages = self.pages.get(&def.index_no()).cloned().unwrap_or_default();
        self.stats.record_index_open();
        log::debug!(
            "opened {} index no {} of document '{}' ({} pages)",
            def.kind().name(),
            def.index_no(),
            self.document,
            pages.len()
        );
        Ok(Box::new(MemoryIndexCursor {
            pages,
            page: 0,
            slot: 0,
            stats: Arc::clone(&self.stats),
            closed: false,
        }))
    }
}

struct MemoryIndexCursor {
    pages: Arc<Vec<Vec<IndexEntry>>>,
    page: usize,
    slot: usize,
    stats: Arc<StoreStats>,
    closed: bool,
}

impl IndexPageCursor for MemoryIndexCursor {
    fn next_entry(&mut self) -> Result<Option<IndexEntry>> {
        if self.closed {
            return Ok(None);
        }
        while self.page < self.pages.len() {
            let page = &self.pages[self.page];
            if self.slot < page.len() {
                let entry = page[self.slot].clone();
                self.slot += 1;
                return Ok(Some(entry));
            }
            self.page += 1;
            self.slot = 0;
            log::trace!("advanced to index page {}", self.page);
        }
        Ok(None)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.stats.record_index_cursor_close();
        }
    }
}

impl Drop for MemoryIndexCursor {
    fn drop(&mut self) {
        self.close();
    }
}
