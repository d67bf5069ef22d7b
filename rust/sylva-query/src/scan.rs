//! The `scan-path-index` operation.

use sylva_common::{Result, error::Error};
use sylva_path_index::PathFilter;
use sylva_store::index::IndexKind;
use sylva_store::resolve::resolve_document;

use crate::args;
use crate::function::{ArgValue, Param, ParamKind, QueryContext, QueryFunction, Signature};
use crate::sequence::NodeSequence;

/// Scans a document's path index for nodes matching optional path
/// patterns.
///
/// `scan-path-index(collection, document, index-no, paths?)` resolves the
/// named collection and document, verifies that `index-no` names a path
/// index in the document's catalog, compiles the optional
/// semicolon-delimited `paths` patterns, and returns the lazy
/// [`NodeSequence`] over the matching nodes. All four validations happen
/// here, synchronously: a sequence is only handed back once they pass,
/// and no index page is touched until its first pull.
pub struct ScanPathIndex;

const SIGNATURE: Signature = Signature {
    params: &[
        Param {
            name: "collection",
            kind: ParamKind::Str,
            required: true,
        },
        Param {
            name: "document",
            kind: ParamKind::Str,
            required: true,
        },
        Param {
            name: "index-no",
            kind: ParamKind::Int,
            required: true,
        },
        Param {
            name: "paths",
            kind: ParamKind::Str,
            required: false,
        },
    ],
};

impl ScanPathIndex {
    /// The operation's registry name.
    pub const NAME: &'static str = "sylva:scan-path-index";

    pub fn new() -> ScanPathIndex {
        ScanPathIndex
    }
}

impl Default for ScanPathIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryFunction for ScanPathIndex {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn signature(&self) -> &Signature {
        &SIGNATURE
    }

    fn execute(&self, ctx: &QueryContext, args: &[ArgValue]) -> Result<NodeSequence> {
        self.signature().check_arity(args)?;
        let collection = args::get_str(args, 0, "collection")?;
        let document = args::get_str(args, 1, "document")?;
        let index_no = args::get_int(args, 2, "index-no")?;
        let index_no = u32::try_from(index_no).map_err(|_| {
            Error::invalid_arg("index-no", format!("index number out of range: {index_no}"))
        })?;

        let col = ctx.store().lookup(collection)?;
        let doc = resolve_document(col.as_ref(), document)?;
        let def = doc
            .index_catalog()
            .require(index_no, IndexKind::Path, collection, document)?
            .clone();

        let paths = args::get_opt_str(args, 3, "paths")?;
        let filter = PathFilter::compile(paths)?;

        log::debug!(
            "scan-path-index validated: collection '{collection}', document '{document}', \
             index no {index_no}, revision {}",
            doc.revision()
        );
        Ok(NodeSequence::new(doc, def, filter))
    }
}
