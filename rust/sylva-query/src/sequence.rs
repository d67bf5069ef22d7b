//! The lazy node sequence returned by `scan-path-index`.

use std::sync::Arc;

use sylva_common::Result;
use sylva_path_index::{NodeKeyStream, PathFilter, PathIndexScanner};
use sylva_store::DocumentHandle;
use sylva_store::index::IndexDef;
use sylva_store::node::Node;

/// A cold, single-consumer, forward-only sequence of resolved nodes.
///
/// The sequence is an explicit state machine:
///
/// ```text
/// Uninitialized --first pull--> Opened --stream end--> Exhausted
///       \                        |   \--pull error--> Exhausted (error returned)
///        \----close----> Closed <+---------close----------/
/// ```
///
/// The scanner/stream chain is built on the first pull only; the
/// document, definition and filter captured at construction were already
/// validated eagerly by the operation. `Closed` is terminal; a new scan
/// request always creates a new sequence. Pulls in `Exhausted` or
/// `Closed` return `Ok(None)`, and [`close`](NodeSequence::close) is
/// idempotent and safe even if nothing was ever opened. Dropping the
/// sequence closes it, so abandoning iteration early cannot leak the
/// underlying cursor.
pub struct NodeSequence {
    doc: Arc<dyn DocumentHandle>,
    def: IndexDef,
    filter: PathFilter,
    state: State,
}

impl std::fmt::Debug for NodeSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeSequence")
            .field("def", &self.def)
            .field("filter", &self.filter)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

enum State {
    Uninitialized,
    Opened(NodeKeyStream),
    Exhausted,
    Closed,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Uninitialized => "Uninitialized",
            State::Opened(_) => "Opened",
            State::Exhausted => "Exhausted",
            State::Closed => "Closed",
        };
        f.write_str(name)
    }
}

impl NodeSequence {
    pub fn new(doc: Arc<dyn DocumentHandle>, def: IndexDef, filter: PathFilter) -> NodeSequence {
        NodeSequence {
            doc,
            def,
            filter,
            state: State::Uninitialized,
        }
    }

    /// Pulls the next resolved node.
    ///
    /// The first pull builds and opens the underlying key stream. A
    /// failing pull (resolution failure, storage fault) releases the
    /// stream, terminates the sequence and returns the error; there is no
    /// retry at this layer, and subsequent pulls return `Ok(None)`.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        loop {
            match &mut self.state {
                State::Uninitialized => {
                    let scanner = PathIndexScanner::new(
                        self.doc.page_transaction(),
                        self.def.clone(),
                        self.filter.clone(),
                    );
                    self.state =
                        State::Opened(NodeKeyStream::new(scanner, Arc::clone(&self.doc)));
                }
                State::Opened(stream) => match stream.next_node() {
                    Ok(Some(node)) => return Ok(Some(node)),
                    Ok(None) => {
                        stream.close();
                        self.state = State::Exhausted;
                        return Ok(None);
                    }
                    Err(e) => {
                        stream.close();
                        self.state = State::Exhausted;
                        return Err(e);
                    }
                },
                State::Exhausted | State::Closed => return Ok(None),
            }
        }
    }

    /// Closes the sequence, releasing the underlying stream if one was
    /// opened. Idempotent; safe before any pull and after exhaustion.
    pub fn close(&mut self) {
        if let State::Opened(stream) = &mut self.state {
            stream.close();
            log::debug!(
                "scan of index no {} on document '{}' closed before exhaustion",
                self.def.index_no(),
                self.doc.document_name()
            );
        }
        self.state = State::Closed;
    }
}

impl Iterator for NodeSequence {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = sylva_common::try_or_ret_some_err!(self.next_node());
        node.map(Ok)
    }
}

impl Drop for NodeSequence {
    fn drop(&mut self) {
        self.close();
    }
}
