use std::sync::Arc;

use sylva_common::Result;
use sylva_common::error::ErrorKind;
use sylva_query::{ArgValue, NodeSequence, QueryContext, ScanPathIndex, register_builtins, registry};
use sylva_store::index::{IndexDef, IndexKind};
use sylva_store::memory::{CollectionFixture, DocumentFixture, MemoryStore, MemoryStoreBuilder};

/// Collection "store": "doc1" carries a name index #0 and a path index #2
/// covering "/a/b" and "/a/c"; "doc2" exists to prove resolution picks by
/// name, not position.
fn sample_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStoreBuilder::new()
            .page_size(1)
            .collection(
                CollectionFixture::new("store")
                    .document(
                        DocumentFixture::new("doc2")
                            .index(IndexDef::new(2, IndexKind::Path, ["/z"]))
                            .node(40, "/z")
                            .index_entry(2, "/z", [40]),
                    )
                    .document(
                        DocumentFixture::new("doc1")
                            .index(IndexDef::new(0, IndexKind::Name, Vec::<String>::new()))
                            .index(IndexDef::new(2, IndexKind::Path, ["/a/b", "/a/c"]))
                            .node(10, "/a")
                            .node_with_value(11, "/a/b", Some("b1"))
                            .node(12, "/a/b")
                            .node(13, "/a/c")
                            .index_entry(2, "/a/b", [11, 12])
                            .index_entry(2, "/a/c", [13]),
                    ),
            )
            .build()
            .unwrap(),
    )
}

fn scan(store: &Arc<MemoryStore>, args: &[ArgValue]) -> Result<NodeSequence> {
    register_builtins();
    let function = registry::get(ScanPathIndex::NAME).unwrap();
    let ctx = QueryContext::new(Arc::clone(store) as Arc<dyn sylva_store::DocumentStore>);
    function.execute(&ctx, args)
}

fn str_arg(value: &str) -> ArgValue {
    ArgValue::Str(value.to_string())
}

fn drain_keys(sequence: &mut NodeSequence) -> Vec<u64> {
    let mut keys = Vec::new();
    while let Some(node) = sequence.next_node().unwrap() {
        keys.push(node.key().as_u64());
    }
    keys
}

#[test]
fn unfiltered_scan_returns_all_indexed_nodes_in_index_order() {
    let store = sample_store();
    let mut sequence = scan(
        &store,
        &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2), ArgValue::Null],
    )
    .unwrap();
    assert_eq!(drain_keys(&mut sequence), [11, 12, 13]);
}

#[test]
fn filtered_scan_excludes_other_paths() {
    let store = sample_store();
    let mut sequence = scan(
        &store,
        &[
            str_arg("store"),
            str_arg("doc1"),
            ArgValue::Int(2),
            str_arg("/a/b"),
        ],
    )
    .unwrap();
    assert_eq!(drain_keys(&mut sequence), [11, 12]);
}

#[test]
fn semicolon_patterns_have_or_semantics() {
    let store = sample_store();
    let mut sequence = scan(
        &store,
        &[
            str_arg("store"),
            str_arg("doc1"),
            ArgValue::Int(2),
            str_arg("/a/b;/a/c"),
        ],
    )
    .unwrap();
    assert_eq!(drain_keys(&mut sequence), [11, 12, 13]);
}

#[test]
fn validation_is_synchronous_and_touches_no_index_pages() {
    let store = sample_store();

    let err = scan(
        &store,
        &[str_arg("store"), str_arg("missing-doc"), ArgValue::Int(0)],
    )
    .unwrap_err();
    match err.kind() {
        ErrorKind::DocumentNotFound { document } => assert_eq!(document, "missing-doc"),
        other => panic!("unexpected kind: {other:?}"),
    }

    let err = scan(
        &store,
        &[str_arg("nowhere"), str_arg("doc1"), ArgValue::Int(2)],
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::CollectionNotFound { .. }));

    // Index no 0 exists on doc1 but is a name index.
    let err = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(0)]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidIndexType { .. }));

    let err = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(7)]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::IndexNotFound { index_no: 7, .. }));

    let err = scan(
        &store,
        &[
            str_arg("store"),
            str_arg("doc1"),
            ArgValue::Int(2),
            str_arg("not-a-path"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::FilterCompilation { .. }));

    // None of the failures above touched an index page.
    assert_eq!(store.stats().index_opens(), 0);
    // And no document cursor leaked along the way.
    assert_eq!(store.stats().open_document_cursors(), 0);
}

#[test]
fn sequence_is_lazy_until_the_first_pull() {
    let store = sample_store();
    let mut sequence = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2)]).unwrap();
    assert_eq!(store.stats().index_opens(), 0);

    assert!(sequence.next_node().unwrap().is_some());
    assert_eq!(store.stats().index_opens(), 1);
}

#[test]
fn close_is_idempotent_in_every_state() {
    let store = sample_store();

    // Close before any pull: nothing was opened, nothing to release.
    let mut sequence = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2)]).unwrap();
    sequence.close();
    sequence.close();
    assert_eq!(store.stats().index_opens(), 0);
    assert!(sequence.next_node().unwrap().is_none());

    // Close mid-iteration releases the cursor exactly once.
    let mut sequence = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2)]).unwrap();
    assert!(sequence.next_node().unwrap().is_some());
    sequence.close();
    sequence.close();
    assert_eq!(store.stats().open_index_cursors(), 0);
    assert!(sequence.next_node().unwrap().is_none());

    // Close after exhaustion is equally benign.
    let mut sequence = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2)]).unwrap();
    let _ = drain_keys(&mut sequence);
    sequence.close();
    assert_eq!(store.stats().open_index_cursors(), 0);
}

#[test]
fn dropping_a_sequence_mid_iteration_releases_the_cursor() {
    let store = sample_store();
    {
        let mut sequence =
            scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2)]).unwrap();
        assert!(sequence.next_node().unwrap().is_some());
        assert_eq!(store.stats().open_index_cursors(), 1);
    }
    assert_eq!(store.stats().open_index_cursors(), 0);
}

#[test]
fn resolution_failure_surfaces_at_the_offending_pull_and_terminates() {
    let store = Arc::new(
        MemoryStoreBuilder::new()
            .collection(
                CollectionFixture::new("store").document(
                    DocumentFixture::new("doc1")
                        .index(IndexDef::new(2, IndexKind::Path, ["/a/b"]))
                        .node(11, "/a/b")
                        .node(12, "/a/b")
                        // Key 99 is recorded by the index but has no node.
                        .index_entry(2, "/a/b", [11, 99, 12]),
                ),
            )
            .build()
            .unwrap(),
    );
    let mut sequence = scan(&store, &[str_arg("store"), str_arg("doc1"), ArgValue::Int(2)]).unwrap();

    assert!(sequence.next_node().unwrap().is_some());
    let err = sequence.next_node().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NodeResolution { key: 99, .. }));

    // The error terminated the sequence and released the cursor; the key
    // after the dangling one is never delivered.
    assert!(sequence.next_node().unwrap().is_none());
    assert_eq!(store.stats().open_index_cursors(), 0);
}

#[test]
fn sequence_iterates_as_results() {
    let store = sample_store();
    let sequence = scan(
        &store,
        &[
            str_arg("store"),
            str_arg("doc1"),
            ArgValue::Int(2),
            str_arg("/a/*"),
        ],
    )
    .unwrap();

    let nodes: Vec<_> = sequence.map(Result::unwrap).collect();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].value(), Some("b1"));
    assert!(nodes.iter().all(|node| node.revision() == 1));
}

#[test]
fn argument_errors_are_invalid_argument() {
    let store = sample_store();

    let err = scan(&store, &[str_arg("store"), str_arg("doc1")]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let err = scan(
        &store,
        &[str_arg("store"), str_arg("doc1"), ArgValue::Int(-1)],
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let err = scan(
        &store,
        &[str_arg("store"), ArgValue::Int(1), ArgValue::Int(2)],
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

#[test]
fn functions_resolve_through_the_registry_by_name() {
    register_builtins();
    let function = registry::get("sylva:scan-path-index").unwrap();
    assert_eq!(function.name(), ScanPathIndex::NAME);
    assert_eq!(function.signature().params.len(), 4);
    assert!(registry::get("sylva:no-such-function").is_err());
}
