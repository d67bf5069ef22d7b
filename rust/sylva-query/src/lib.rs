//! Query-function infrastructure and the `scan-path-index` operation.
//!
//! This crate is the seam between the query-language runtime and the
//! store: runtime-facing operations implement the plain [`QueryFunction`]
//! trait (name, signature, execute) and are registered into the global
//! [`registry`] capability table; no base-class coupling. The one
//! operation shipped here is [`ScanPathIndex`], which validates its
//! arguments eagerly and hands back the lazy [`NodeSequence`].

pub mod args;
pub mod function;
pub mod registry;
pub mod scan;
pub mod sequence;

pub use function::{ArgValue, Param, ParamKind, QueryContext, QueryFunction, Signature};
pub use scan::ScanPathIndex;
pub use sequence::NodeSequence;

use std::sync::Arc;

/// Registers the built-in query functions into the global registry.
pub fn register_builtins() {
    registry::add(Arc::new(ScanPathIndex::new()) as Arc<dyn QueryFunction>);
}
