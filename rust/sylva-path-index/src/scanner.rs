//! Lazy forward scan of a path index's raw keys.

use std::collections::VecDeque;
use std::sync::Arc;

use sylva_common::Result;
use sylva_store::index::IndexDef;
use sylva_store::{IndexPageCursor, PageTransaction};

use crate::filter::PathFilter;
use sylva_store::node::NodeKey;

/// A forward stream of the raw node keys recorded by one path index,
/// restricted to entries whose materialized path satisfies the filter.
///
/// The scanner is cold: constructing it touches no index pages. The page
/// cursor is opened by the first [`next_key`](PathIndexScanner::next_key)
/// pull, and released on exhaustion, on the first error, on
/// [`close`](PathIndexScanner::close), or on drop, whichever comes first.
/// Keys are yielded in the index's natural entry order, each at most once;
/// no additional sort is applied.
pub struct PathIndexScanner {
    trx: Arc<dyn PageTransaction>,
    def: IndexDef,
    filter: PathFilter,
    state: State,
}

enum State {
    /// No page access has happened yet.
    Unopened,
    /// The page cursor is live; `pending` holds the not-yet-delivered keys
    /// of the current matching entry.
    Open {
        cursor: Box<dyn IndexPageCursor>,
        pending: VecDeque<NodeKey>,
    },
    /// Exhausted, failed or closed; the cursor is released.
    Done,
}

impl PathIndexScanner {
    pub fn new(trx: Arc<dyn PageTransaction>, def: IndexDef, filter: PathFilter) -> Self {
        PathIndexScanner {
            trx,
            def,
            filter,
            state: State::Unopened,
        }
    }

    /// Pulls the next matching raw key.
    ///
    /// Returns `Ok(None)` once the index is exhausted (and after `close`).
    /// A storage fault terminates the scan: the cursor is released, the
    /// error is returned, and subsequent pulls return `Ok(None)`.
    pub fn next_key(&mut self) -> Result<Option<NodeKey>> {
        loop {
            match &mut self.state {
                State::Unopened => {
                    let cursor = match self.trx.open_index(&self.def) {
                        Ok(cursor) => cursor,
                        Err(e) => {
                            self.state = State::Done;
                            return Err(e);
                        }
                    };
                    log::debug!(
                        "path index scan opened (index no {}, filter: {})",
                        self.def.index_no(),
                        if self.filter.is_match_all() {
                            "match-all".to_string()
                        } else {
                            format!("{} pattern(s)", self.filter.patterns().len())
                        }
                    );
                    self.state = State::Open {
                        cursor,
                        pending: VecDeque::new(),
                    };
                }
                State::Open { cursor, pending } => {
                    if let Some(key) = pending.pop_front() {
                        return Ok(Some(key));
                    }
                    match cursor.next_entry() {
                        Ok(Some(entry)) => {
                            if self.filter.matches(&entry.path) {
                                pending.extend(entry.keys);
                            }
                        }
                        Ok(None) => {
                            cursor.close();
                            self.state = State::Done;
                            return Ok(None);
                        }
                        Err(e) => {
                            cursor.close();
                            self.state = State::Done;
                            return Err(e);
                        }
                    }
                }
                State::Done => return Ok(None),
            }
        }
    }

    /// Releases the page cursor if one was opened. Idempotent, and safe on
    /// a scanner that never pulled.
    pub fn close(&mut self) {
        if let State::Open { cursor, .. } = &mut self.state {
            cursor.close();
        }
        self.state = State::Done;
    }
}

impl Drop for PathIndexScanner {
    fn drop(&mut self) {
        self.close();
    }
}
