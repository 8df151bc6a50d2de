//! Deep mutation propagation through nested views.

use docshelf::{Collection, Document, Entry, Node, StoreConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

fn document(entry: Entry) -> Document {
    match entry {
        Entry::Document(document) => document,
        Entry::Collection(_) => panic!("expected a document"),
    }
}

fn view(node: Node) -> Document {
    match node {
        Node::Document(document) => document,
        Node::Value(value) => panic!("expected a view, got scalar {}", value),
    }
}

fn scalar(node: Node) -> Value {
    match node {
        Node::Value(value) => value,
        Node::Document(_) => panic!("expected a scalar, got a view"),
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn deep_mutation_reaches_disk_with_siblings_untouched() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    root.put(
        "site",
        json!({
            "title": "home",
            "nav": {"links": [{"label": "a", "target": "/a"}, {"label": "b", "target": "/b"}]}
        }),
    )
    .unwrap();

    let doc = document(root.resolve("site").unwrap());
    let nav = view(doc.get("nav").unwrap());
    let links = view(nav.get("links").unwrap());
    let mut second = view(links.get(1).unwrap());
    second.set("target", "/b2").unwrap();

    assert_eq!(
        read_json(&dir.path().join("site.json")),
        json!({
            "title": "home",
            "nav": {"links": [{"label": "a", "target": "/a"}, {"label": "b", "target": "/b2"}]}
        })
    );
}

#[test]
fn scalar_and_container_lookups_are_distinguished() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    root.put("doc", json!({"count": 3, "items": ["a"]})).unwrap();

    let doc = document(root.resolve("doc").unwrap());
    assert_eq!(scalar(doc.get("count").unwrap()), json!(3));

    let mut items = view(doc.get("items").unwrap());
    items.set(0, "z").unwrap();
    assert_eq!(
        read_json(&dir.path().join("doc.json")),
        json!({"count": 3, "items": ["z"]})
    );
}

#[test]
fn nested_view_shares_load_with_root_view() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    root.put("doc", json!({"inner": {"k": 1}})).unwrap();

    let doc = document(root.resolve("doc").unwrap());
    let mut inner = view(doc.get("inner").unwrap());
    inner.set("k", 2).unwrap();

    // The root view of the same load sees the mutation immediately.
    assert_eq!(doc.value().unwrap(), json!({"inner": {"k": 2}}));
}

#[test]
fn reload_discards_unsaved_edits() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    root.put("doc", json!({"state": "persisted"})).unwrap();

    let mut doc = document(root.resolve("doc").unwrap());
    doc.set("state", "saved-too").unwrap();

    // Overwrite the file behind this load's back, then reload.
    root.put("doc", json!({"state": "external"})).unwrap();
    doc.reload().unwrap();

    assert_eq!(doc.value().unwrap(), json!({"state": "external"}));
}

#[test]
fn exists_tracks_the_backing_file() {
    let dir = TempDir::new().unwrap();
    let mut ghost = Document::open(dir.path().join("ghost"), StoreConfig::default()).unwrap();

    assert!(!ghost.exists());
    ghost.save().unwrap();
    assert!(ghost.exists());
    assert!(dir.path().join("ghost.json").is_file());
}

#[test]
fn explicit_save_flushes_whole_value() {
    let dir = TempDir::new().unwrap();
    let mut doc = Document::create(
        dir.path().join("doc"),
        json!({"a": 1, "b": {"c": 2}}),
        StoreConfig::default(),
    )
    .unwrap();

    assert!(!doc.exists());
    doc.save().unwrap();
    assert_eq!(
        read_json(&dir.path().join("doc.json")),
        json!({"a": 1, "b": {"c": 2}})
    );
}

#[test]
fn top_level_array_documents_work() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    root.put("list", json!([{"n": 1}, {"n": 2}])).unwrap();

    let doc = document(root.resolve("list").unwrap());
    let mut first = view(doc.get(0).unwrap());
    first.set("n", 10).unwrap();

    assert_eq!(
        read_json(&dir.path().join("list.json")),
        json!([{"n": 10}, {"n": 2}])
    );
}
