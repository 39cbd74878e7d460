//! End-to-end tests over an on-disk SQLite store.
//!
//! Topics are written through the versioning API (or imported as historical
//! records) into a temporary database, then queried through `TopicGraph`.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use topicgraph::graph::NodeKind;
use topicgraph::{
    NewTopic, SqliteTopicStore, Topic, TopicChanges, TopicGraph, TopicGraphError, TopicStore,
    TopicVersioning,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store() -> (TempDir, SqliteTopicStore) {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("topics.db");
    let store = SqliteTopicStore::new(db.to_str().unwrap()).unwrap();
    (dir, store)
}

fn create(store: &SqliteTopicStore, name: &str, parent: Option<&Topic>) -> Topic {
    TopicVersioning::new(store)
        .create_topic(NewTopic {
            name: name.to_string(),
            content: format!("About {name}"),
            parent_topic_id: parent.map(|p| p.id.clone()),
            ..NewTopic::default()
        })
        .unwrap()
}

fn ids(topics: &[Topic]) -> Vec<&str> {
    topics.iter().map(|t| t.id.as_str()).collect()
}

/// Languages -> (Rust -> (Ownership -> Borrowing), Go), plus Cooking.
struct Fixture {
    _dir: TempDir,
    store: SqliteTopicStore,
    languages: Topic,
    rust: Topic,
    ownership: Topic,
    borrowing: Topic,
    go: Topic,
    cooking: Topic,
}

fn setup() -> Fixture {
    let (dir, store) = open_store();
    let languages = create(&store, "Languages", None);
    let rust = create(&store, "Rust", Some(&languages));
    let ownership = create(&store, "Ownership", Some(&rust));
    let borrowing = create(&store, "Borrowing", Some(&ownership));
    let go = create(&store, "Go", Some(&languages));
    let cooking = create(&store, "Cooking", None);
    Fixture {
        _dir: dir,
        store,
        languages,
        rust,
        ownership,
        borrowing,
        go,
        cooking,
    }
}

// ===========================================================================
// 1. Trees and forest
// ===========================================================================

#[test]
fn tree_is_built_from_sqlite_in_insertion_order() {
    let f = setup();
    let graph = TopicGraph::new(&f.store);
    let tree = graph.build_tree(&f.languages.id, true).unwrap();

    assert_eq!(tree.kind, NodeKind::Composite);
    assert_eq!(tree.total_descendants, 4);
    let children: Vec<&str> = tree.children.iter().map(|c| c.topic.name.as_str()).collect();
    assert_eq!(children, vec!["Rust", "Go"]);
    assert_eq!(tree.children[1].kind, NodeKind::Leaf);
    assert_eq!(tree.children[1].child_count, 0);
}

#[test]
fn forest_lists_every_root() {
    let f = setup();
    let graph = TopicGraph::new(&f.store);
    let forest = graph.build_forest(true).unwrap();
    let roots: Vec<&str> = forest.iter().map(|t| t.topic.id.as_str()).collect();
    assert_eq!(roots, vec![f.languages.id.as_str(), f.cooking.id.as_str()]);
}

#[test]
fn missing_tree_root_is_not_found() {
    let f = setup();
    let graph = TopicGraph::new(&f.store);
    assert!(matches!(
        graph.build_tree("does-not-exist", true),
        Err(TopicGraphError::NotFound(_))
    ));
}

#[test]
fn descendants_of_three_level_root() {
    let f = setup();
    let graph = TopicGraph::new(&f.store);
    let found: HashSet<String> = graph
        .get_descendants(&f.languages.id, true)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    let expected: HashSet<String> = [&f.rust, &f.ownership, &f.borrowing, &f.go]
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(found, expected);
}

// ===========================================================================
// 2. Paths
// ===========================================================================

#[test]
fn path_to_root_is_root_first() {
    let f = setup();
    let graph = TopicGraph::new(&f.store);
    let path = graph.get_path(&f.borrowing.id, true).unwrap();
    assert_eq!(
        ids(&path),
        vec![
            f.languages.id.as_str(),
            f.rust.id.as_str(),
            f.ownership.id.as_str(),
            f.borrowing.id.as_str()
        ]
    );
    assert!(graph.get_path("missing", true).unwrap().is_empty());
}

#[test]
fn shortest_path_across_siblings_and_components() {
    let f = setup();
    let graph = TopicGraph::new(&f.store);

    let result = graph.find_shortest_path(&f.borrowing.id, &f.go.id, true).unwrap();
    assert!(result.path_exists);
    assert_eq!(result.distance, 4);
    assert_eq!(result.path.first().map(|t| t.id.as_str()), Some(f.borrowing.id.as_str()));
    assert_eq!(result.path.last().map(|t| t.id.as_str()), Some(f.go.id.as_str()));

    let none = graph.find_shortest_path(&f.go.id, &f.cooking.id, true).unwrap();
    assert!(!none.path_exists);
    assert_eq!(none.distance, -1);
}

// ===========================================================================
// 3. Versioning
// ===========================================================================

#[test]
fn new_version_keeps_children_attached() {
    let f = setup();
    let versioning = TopicVersioning::new(&f.store);
    let rust_v2 = versioning
        .create_new_version(
            &f.rust.id,
            TopicChanges {
                name: Some("Rust 2024".into()),
                ..TopicChanges::default()
            },
        )
        .unwrap();

    let graph = TopicGraph::new(&f.store);
    let tree = graph.build_tree(&f.languages.id, true).unwrap();
    // The new version was inserted last, so it now follows Go.
    let names: Vec<&str> = tree.children.iter().map(|c| c.topic.name.as_str()).collect();
    assert_eq!(names, vec!["Go", "Rust 2024"]);
    let rust_node = &tree.children[1];
    assert_eq!(rust_node.topic.id, rust_v2.id);
    assert_eq!(rust_node.children[0].topic.id, f.ownership.id);

    // Stale id redirects under the latest policy and stays literal otherwise.
    let latest = graph.find_shortest_path(&f.rust.id, &f.borrowing.id, true).unwrap();
    assert_eq!(latest.path[0].id, rust_v2.id);
    let exact = graph.find_shortest_path(&f.rust.id, &f.borrowing.id, false).unwrap();
    assert_eq!(exact.path[0].id, f.rust.id);
    assert_eq!(exact.distance, 2);

    // Both Rust versions hang off Languages when every version is queried.
    let all = graph.build_tree(&f.languages.id, false).unwrap();
    assert_eq!(all.child_count, 3);
    assert_eq!(tree.child_count, 2);
}

#[test]
fn delete_requires_childless_topic() {
    let f = setup();
    let versioning = TopicVersioning::new(&f.store);
    assert!(matches!(
        versioning.delete_topic(&f.ownership.id),
        Err(TopicGraphError::HasChildren(_))
    ));
    assert_eq!(versioning.delete_topic(&f.borrowing.id).unwrap(), 1);
    assert_eq!(versioning.delete_topic(&f.ownership.id).unwrap(), 1);
    assert!(f.store.find_by_id(&f.ownership.id).unwrap().is_none());
}

// ===========================================================================
// 4. Historical data
// ===========================================================================

#[test]
fn imported_records_with_legacy_parent_references() {
    let (_dir, store) = open_store();

    let root = Topic::first_version("root", "Root", None);
    let mut root_v2 = root.next_version("root-v2");
    root_v2.name = "Root v2".into();
    let mut stale_root = root.clone();
    stale_root.is_latest = false;
    // Child points at a version id, and a legacy record lacks a base id.
    let by_version = Topic::first_version("by-version", "By version", Some("root-v2"));
    let mut no_base = Topic::first_version("no-base", "No base", Some("root"));
    no_base.base_topic_id = None;

    let imported = store
        .import_topics(&[stale_root, root_v2, by_version, no_base])
        .unwrap();
    assert_eq!(imported, 4);
    assert_eq!(store.count().unwrap(), 4);

    let graph = TopicGraph::new(&store);
    let result = graph.find_shortest_path("by-version", "no-base", true).unwrap();
    assert_eq!(ids(&result.path), vec!["by-version", "root-v2", "no-base"]);

    let path = graph.get_path("no-base", true).unwrap();
    assert_eq!(ids(&path), vec!["root-v2", "no-base"]);
}

#[test]
fn import_rolls_back_on_duplicate() {
    let (_dir, store) = open_store();
    let a = Topic::first_version("a", "A", None);
    let err = store.import_topics(&[a.clone(), a]).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn topics_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("topics.db");
    let created = {
        let store = SqliteTopicStore::new(db.to_str().unwrap()).unwrap();
        create(&store, "Durable", None)
    };
    let store = SqliteTopicStore::new(db.to_str().unwrap()).unwrap();
    let found = store.find_by_id(&created.id).unwrap().unwrap();
    assert_eq!(found.name, "Durable");
    assert_eq!(found.created_at, created.created_at);
}
