//! Linear predicate scans over collections.

use docshelf::{Collection, Entry, StoreConfig};
use serde_json::json;
use tempfile::TempDir;

fn collection(entry: Entry) -> Collection {
    match entry {
        Entry::Collection(collection) => collection,
        Entry::Document(_) => panic!("expected a collection"),
    }
}

#[test]
fn query_returns_exactly_the_matching_subset() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    for (name, age) in [("alice", 30), ("bob", 17), ("carol", 45), ("dave", 12)] {
        root.put(name, json!({"name": name, "age": age})).unwrap();
    }

    let adults = root
        .query(|value| value["age"].as_i64().unwrap_or(0) >= 18)
        .unwrap();

    let mut names: Vec<String> = adults
        .iter()
        .map(|value| value["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["alice", "carol"]);
}

#[test]
fn query_skips_sub_collections_and_ghosts() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    root.put("doc", json!({"kind": "real"})).unwrap();

    // A written sub-collection becomes a directory; a resolved-only one
    // stays a ghost. Neither may appear in the scan.
    collection(root.resolve("written").unwrap())
        .put("inner", json!({"kind": "nested"}))
        .unwrap();
    let _ghost = collection(root.resolve("ghost").unwrap());

    let all = root.query(|_| true).unwrap();
    assert_eq!(all, vec![json!({"kind": "real"})]);
}

#[test]
fn query_on_ghost_collection_is_empty() {
    let dir = TempDir::new().unwrap();
    let root = Collection::new(dir.path());
    let ghost = collection(root.resolve("nope").unwrap());

    assert!(ghost.query(|_| true).unwrap().is_empty());
}

#[test]
fn query_respects_configured_extension() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        extension: "doc".to_string(),
        ..StoreConfig::default()
    };
    let root = Collection::with_config(dir.path(), config);
    root.put("entry", json!({"n": 1})).unwrap();

    assert!(dir.path().join("entry.doc").is_file());
    assert_eq!(root.query(|_| true).unwrap(), vec![json!({"n": 1})]);
}
