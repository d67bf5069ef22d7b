//! Document resolution by resource name.

use std::sync::Arc;

use sylva_common::{Result, error::Error};

use crate::{Collection, DocumentHandle};

/// Resolves a document within `collection` by exact resource-name match.
///
/// The collection's documents are scanned in natural order and the first
/// match wins; iteration stops there. Whether two documents may share a
/// resource name is the registry's concern; this resolver only documents
/// the first-match behavior.
///
/// The document cursor is closed on every exit path: match found, cursor
/// exhausted, and failure mid-iteration.
pub fn resolve_document(
    collection: &dyn Collection,
    document: &str,
) -> Result<Arc<dyn DocumentHandle>> {
    let mut docs = collection.open_documents()?;
    loop {
        match docs.next() {
            Ok(Some(doc)) => {
                if doc.document_name() == document {
                    docs.close();
                    log::debug!(
                        "resolved document '{}' in collection '{}' at revision {}",
                        document,
                        collection.name(),
                        doc.revision()
                    );
                    return Ok(doc);
                }
            }
            Ok(None) => {
                docs.close();
                return Err(Error::document_not_found(document));
            }
            Err(e) => {
                docs.close();
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStore;
    use crate::memory::{CollectionFixture, DocumentFixture, MemoryStore, MemoryStoreBuilder};
    use sylva_common::error::ErrorKind;

    fn store_with_documents(names: &[&str]) -> MemoryStore {
        let mut collection = CollectionFixture::new("col");
        for (idx, name) in names.iter().enumerate() {
            collection = collection.document(DocumentFixture::new(*name).revision(idx as u64 + 1));
        }
        MemoryStoreBuilder::new()
            .collection(collection)
            .build()
            .unwrap()
    }

    #[test]
    fn first_match_in_iteration_order_wins() {
        let store = store_with_documents(&["doc1", "doc2", "doc2"]);
        let collection = store.lookup("col").unwrap();

        // Duplicate names resolve to the earliest document in natural order.
        let doc = resolve_document(collection.as_ref(), "doc2").unwrap();
        assert_eq!(doc.revision(), 2);
    }

    #[test]
    fn exhausted_cursor_reports_document_not_found() {
        let store = store_with_documents(&["doc1"]);
        let collection = store.lookup("col").unwrap();

        let err = resolve_document(collection.as_ref(), "missing-doc").unwrap_err();
        match err.kind() {
            ErrorKind::DocumentNotFound { document } => assert_eq!(document, "missing-doc"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn cursor_is_released_on_every_path() {
        let store = store_with_documents(&["doc1", "doc2"]);
        let collection = store.lookup("col").unwrap();

        let _ = resolve_document(collection.as_ref(), "doc2").unwrap();
        assert_eq!(store.stats().open_document_cursors(), 0);

        let _ = resolve_document(collection.as_ref(), "missing-doc").unwrap_err();
        assert_eq!(store.stats().open_document_cursors(), 0);
    }
}
