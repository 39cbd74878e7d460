//! `TopicGraph`: the query surface callers use.
//!
//! Wraps the tree builder and the shortest-path engine over one borrowed
//! store, validates identifiers before any traversal and hands back plain
//! serializable data.

use crate::error::{Result, TopicGraphError};
use crate::graph::node::SerializedTreeNode;
use crate::graph::shortest_path::{ShortestPathEngine, ShortestPathResult};
use crate::graph::tree::TreeBuilder;
use crate::store::TopicStore;
use crate::types::Topic;

/// Read-only query facade over a [`TopicStore`].
pub struct TopicGraph<'a, S: ?Sized> {
    tree: TreeBuilder<'a, S>,
    paths: ShortestPathEngine<'a, S>,
}

impl<'a, S: TopicStore + ?Sized> TopicGraph<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            tree: TreeBuilder::new(store),
            paths: ShortestPathEngine::new(store),
        }
    }

    /// Serialized tree rooted at `root_id`.
    pub fn build_tree(&self, root_id: &str, only_latest: bool) -> Result<SerializedTreeNode> {
        let root_id = require_id("rootId", root_id)?;
        let tree = self.tree.build_tree(root_id, only_latest)?;
        tracing::debug!(
            root = root_id,
            descendants = tree.total_descendants(),
            "built topic tree"
        );
        Ok(tree.to_serialized())
    }

    /// One serialized tree per root topic.
    pub fn build_forest(&self, only_latest: bool) -> Result<Vec<SerializedTreeNode>> {
        let forest = self.tree.build_forest(only_latest)?;
        Ok(forest.iter().map(|tree| tree.to_serialized()).collect())
    }

    /// Root-first ancestor chain ending at `id`; empty if `id` is unknown.
    pub fn get_path(&self, id: &str, only_latest: bool) -> Result<Vec<Topic>> {
        let id = require_id("id", id)?;
        self.tree.get_path(id, only_latest)
    }

    /// Every topic below `id`, pre-order.
    pub fn get_descendants(&self, id: &str, only_latest: bool) -> Result<Vec<Topic>> {
        let id = require_id("id", id)?;
        self.tree.get_descendants(id, only_latest)
    }

    /// Shortest undirected path between two topics.
    ///
    /// Only invalid identifiers produce an error; missing topics and store
    /// failures come back as a negative result.
    pub fn find_shortest_path(
        &self,
        start_id: &str,
        end_id: &str,
        only_latest: bool,
    ) -> Result<ShortestPathResult> {
        let start_id = require_id("startId", start_id)?;
        let end_id = require_id("endId", end_id)?;
        Ok(self.paths.find_shortest_path(start_id, end_id, only_latest))
    }
}

/// Reject blank identifiers; surrounding whitespace is trimmed.
pub(crate) fn require_id<'s>(field: &str, value: &'s str) -> Result<&'s str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TopicGraphError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::NodeKind;
    use crate::store::MemoryTopicStore;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn topic(id: &str, parent: Option<&str>) -> Topic {
        Topic::first_version(id, id.to_uppercase(), parent)
    }

    /// root -> (a -> (a1 -> a1x), b), plus a second root r2.
    fn setup() -> MemoryTopicStore {
        MemoryTopicStore::with_topics([
            topic("root", None),
            topic("a", Some("root")),
            topic("a1", Some("a")),
            topic("a1x", Some("a1")),
            topic("b", Some("root")),
            topic("r2", None),
        ])
    }

    #[test]
    fn build_tree_serializes_counts() {
        let store = setup();
        let graph = TopicGraph::new(&store);
        let tree = graph.build_tree("root", true).unwrap();
        assert_eq!(tree.kind, NodeKind::Composite);
        assert_eq!(tree.child_count, 2);
        assert_eq!(tree.total_descendants, 4);
        assert_eq!(tree.children[1].kind, NodeKind::Leaf);
    }

    #[test]
    fn build_tree_not_found() {
        let store = setup();
        let graph = TopicGraph::new(&store);
        assert!(matches!(
            graph.build_tree("missing", true),
            Err(TopicGraphError::NotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn forest_covers_every_root() {
        let store = setup();
        let graph = TopicGraph::new(&store);
        let ids: Vec<String> = graph
            .build_forest(true)
            .unwrap()
            .into_iter()
            .map(|t| t.topic.id.clone())
            .collect();
        assert_eq!(ids, vec!["root", "r2"]);
    }

    #[test]
    fn descendants_exclude_root() {
        let store = setup();
        let graph = TopicGraph::new(&store);
        let mut ids: Vec<String> = graph
            .get_descendants("root", true)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "a1", "a1x", "b"]);
        assert!(graph.get_descendants("r2", true).unwrap().is_empty());
        assert!(graph.get_descendants("nope", true).unwrap().is_empty());
    }

    #[test]
    fn path_and_shortest_path_agree_on_ancestry() {
        let store = setup();
        let graph = TopicGraph::new(&store);
        let path: Vec<String> = graph
            .get_path("a1x", true)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(path, vec!["root", "a", "a1", "a1x"]);

        let result = graph.find_shortest_path("root", "a1x", true).unwrap();
        assert_eq!(result.distance, 3);
    }

    #[test]
    fn ids_are_trimmed() {
        let store = setup();
        let graph = TopicGraph::new(&store);
        assert_eq!(graph.build_tree("  root ", true).unwrap().topic.id, "root");
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace")]
    fn blank_ids_are_rejected(id: &str) {
        let store = setup();
        let graph = TopicGraph::new(&store);
        assert!(matches!(graph.build_tree(id, true), Err(TopicGraphError::Validation(_))));
        assert!(matches!(graph.get_path(id, true), Err(TopicGraphError::Validation(_))));
        assert!(matches!(
            graph.get_descendants(id, true),
            Err(TopicGraphError::Validation(_))
        ));
        assert!(matches!(
            graph.find_shortest_path(id, "root", true),
            Err(TopicGraphError::Validation(_))
        ));
        assert!(matches!(
            graph.find_shortest_path("root", id, true),
            Err(TopicGraphError::Validation(_))
        ));
    }

    #[test]
    fn works_through_trait_object() {
        let store = setup();
        let dyn_store: &dyn TopicStore = &store;
        let graph = TopicGraph::new(dyn_store);
        let result = graph.find_shortest_path("a1x", "b", false).unwrap();
        assert_eq!(result.path_ids(), vec!["a1x", "a1", "a", "root", "b"]);
    }
}
