//! Path-index scanning: filter compilation and the lazy key/node streams.
//!
//! The crate provides the read path of a document's path index:
//!
//! 1. [`PathFilter`] compiles optional semicolon-delimited path patterns
//!    into a reusable predicate over materialized paths.
//! 2. [`PathIndexScanner`] opens the index in the document's
//!    page-transaction layer (on first pull only) and streams raw node
//!    keys whose recorded path satisfies the filter.
//! 3. [`NodeKeyStream`] resolves each raw key into a live node within the
//!    scan's document revision.
//!
//! All three are single-consumer, pull-based and cold: nothing touches an
//! index page before the first pull, and `close` is idempotent on every
//! layer.

pub mod filter;
pub mod scanner;
pub mod stream;

pub use filter::{PathFilter, PathPattern};
pub use scanner::PathIndexScanner;
pub use stream::NodeKeyStream;
