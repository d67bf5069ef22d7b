//! Resolution of raw index keys into live nodes.

use std::sync::Arc;

use sylva_common::{Result, error::Error};
use sylva_store::DocumentHandle;
use sylva_store::node::Node;

use crate::scanner::PathIndexScanner;

/// Joins a raw-key scan with the document context needed to materialize
/// each key into a node.
///
/// Each pull takes the next key from the underlying scanner and resolves
/// it within the document revision the handle is bound to. A key the
/// revision cannot materialize is a `NodeResolution` error, never silently
/// skipped. Exhaustion of the scanner is exhaustion of the stream, and
/// `close` delegates to the scanner.
pub struct NodeKeyStream {
    scanner: PathIndexScanner,
    doc: Arc<dyn DocumentHandle>,
}

impl NodeKeyStream {
    pub fn new(scanner: PathIndexScanner, doc: Arc<dyn DocumentHandle>) -> NodeKeyStream {
        NodeKeyStream { scanner, doc }
    }

    /// Resolves the next raw key into a node, or `Ok(None)` on exhaustion.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        let Some(key) = self.scanner.next_key()? else {
            return Ok(None);
        };
        match self.doc.materialize(key)? {
            Some(node) => Ok(Some(node)),
            None => Err(Error::node_resolution(
                key.as_u64(),
                self.doc.document_name(),
            )),
        }
    }

    /// Releases the underlying scan. Idempotent.
    pub fn close(&mut self) {
        self.scanner.close();
    }
}
