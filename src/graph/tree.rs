//! Hierarchical views over the topic store: trees, the forest of all roots,
//! root-to-topic paths and flattened descendant lists.
//!
//! Trees are built with an explicit work stack into a flat arena and then
//! assembled bottom-up. Together with the iterative drop and serialization
//! in [`node`](crate::graph::node), deep hierarchies do not grow the call
//! stack.
//! Parent pointers may form cycles; a child whose base identity already
//! appears on its own ancestor chain is not attached.

use std::collections::HashSet;

use crate::error::{LookupContext, Result, TopicGraphError};
use crate::graph::node::TreeNode;
use crate::graph::resolver::TopicResolver;
use crate::store::{StoreResult, TopicStore};
use crate::types::{Topic, TopicFilter};

/// One arena entry: a topic, whether the store reported children for it,
/// and the arena indices of the children actually attached.
struct Slot {
    topic: Topic,
    parent: Option<usize>,
    has_children: bool,
    children: Vec<usize>,
}

/// Builds trees and paths from a [`TopicStore`].
pub struct TreeBuilder<'a, S: ?Sized> {
    store: &'a S,
    resolver: TopicResolver<'a, S>,
}

impl<'a, S: TopicStore + ?Sized> TreeBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            resolver: TopicResolver::new(store),
        }
    }

    /// Children of `topic` by base identity, latest-only when asked.
    fn children_of(&self, topic: &Topic, only_latest: bool) -> StoreResult<Vec<Topic>> {
        self.store
            .find(&TopicFilter::children_of(topic.base_id()).latest_if(only_latest))
    }

    // -------------------------------------------------------------------
    // build_tree
    // -------------------------------------------------------------------

    /// Build the tree rooted at `root_id`.
    ///
    /// Fails with [`TopicGraphError::NotFound`] when the root does not
    /// resolve, and with a lookup error when the root or its direct child
    /// list cannot be read. Failures below the root only drop the affected
    /// subtree.
    pub fn build_tree(&self, root_id: &str, only_latest: bool) -> Result<TreeNode> {
        let root = self
            .resolver
            .resolve_topic(root_id, only_latest)
            .during("resolve tree root")?
            .ok_or_else(|| TopicGraphError::NotFound(root_id.to_string()))?;
        self.build_from(root, only_latest)
    }

    /// Build the tree under an already-resolved root topic.
    pub fn build_from(&self, root: Topic, only_latest: bool) -> Result<TreeNode> {
        let root_id = root.id.clone();
        let root_children = self
            .children_of(&root, only_latest)
            .during("list tree root children")?;

        let mut slots: Vec<Slot> = vec![Slot {
            has_children: !root_children.is_empty(),
            topic: root,
            parent: None,
            children: Vec::new(),
        }];
        // Reversed so the first child is popped first (pre-order).
        let mut stack: Vec<(Topic, usize)> =
            root_children.into_iter().rev().map(|t| (t, 0)).collect();

        while let Some((topic, parent)) = stack.pop() {
            if on_ancestor_chain(&slots, parent, topic.base_id()) {
                tracing::warn!(
                    topic = %topic.id,
                    parent = %slots[parent].topic.id,
                    "circular parent reference, child not attached"
                );
                continue;
            }
            let grandchildren = match self.children_of(&topic, only_latest) {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(topic = %topic.id, "skipping child that failed to expand: {e}");
                    continue;
                }
            };

            let index = slots.len();
            slots[parent].children.push(index);
            slots.push(Slot {
                has_children: !grandchildren.is_empty(),
                topic,
                parent: Some(parent),
                children: Vec::new(),
            });
            stack.extend(grandchildren.into_iter().rev().map(|t| (t, index)));
        }

        assemble(slots).ok_or(TopicGraphError::NotFound(root_id))
    }

    // -------------------------------------------------------------------
    // build_forest
    // -------------------------------------------------------------------

    /// One tree per topic without a parent.
    ///
    /// A root whose tree cannot be built is logged and skipped.
    pub fn build_forest(&self, only_latest: bool) -> Result<Vec<TreeNode>> {
        let roots = self
            .store
            .find(&TopicFilter::roots().latest_if(only_latest))
            .during("list forest roots")?;

        let mut forest = Vec::with_capacity(roots.len());
        for root in roots {
            let root_id = root.id.clone();
            match self.build_from(root, only_latest) {
                Ok(tree) => forest.push(tree),
                Err(e) => tracing::warn!(root = %root_id, "skipping forest root: {e}"),
            }
        }
        Ok(forest)
    }

    // -------------------------------------------------------------------
    // get_path
    // -------------------------------------------------------------------

    /// Root-first chain of ancestors ending at `id`.
    ///
    /// A missing start topic yields an empty path. Revisiting a topic while
    /// walking up fails with [`TopicGraphError::CircularReference`]. A parent
    /// reference that resolves to nothing ends the walk there.
    pub fn get_path(&self, id: &str, only_latest: bool) -> Result<Vec<Topic>> {
        let Some(mut current) = self
            .resolver
            .resolve_topic(id, only_latest)
            .during("resolve path start")?
        else {
            return Ok(Vec::new());
        };

        let mut visited: HashSet<String> = HashSet::new();
        let mut path = Vec::new();
        loop {
            if !visited.insert(current.id.clone()) {
                return Err(TopicGraphError::CircularReference(current.id));
            }
            let parent_id = current.parent_topic_id.clone();
            path.push(current);

            let Some(parent_id) = parent_id else {
                break;
            };
            match self.resolve_parent(&parent_id, only_latest)? {
                Some(parent) => current = parent,
                None => {
                    tracing::warn!(parent = %parent_id, "dangling parent reference ends path");
                    break;
                }
            }
        }

        path.reverse();
        Ok(path)
    }

    /// A parent reference is a base identity. Older records may hold a
    /// version id instead, which is tried when no version has that base.
    fn resolve_parent(&self, parent_id: &str, only_latest: bool) -> Result<Option<Topic>> {
        if let Some(parent) = self
            .resolver
            .resolve_by_base_id(parent_id, only_latest)
            .during("resolve path ancestor")?
        {
            return Ok(Some(parent));
        }
        self.resolver
            .resolve_topic(parent_id, only_latest)
            .during("resolve path ancestor by version id")
    }

    // -------------------------------------------------------------------
    // get_descendants
    // -------------------------------------------------------------------

    /// Every topic below `id` in pre-order, excluding `id` itself.
    ///
    /// Empty when `id` does not exist or has no children.
    pub fn get_descendants(&self, id: &str, only_latest: bool) -> Result<Vec<Topic>> {
        match self.build_tree(id, only_latest) {
            Ok(tree) => Ok(tree.descendants().into_iter().cloned().collect()),
            Err(TopicGraphError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

/// Does `base_id` belong to the slot at `index` or any of its ancestors?
fn on_ancestor_chain(slots: &[Slot], index: usize, base_id: &str) -> bool {
    let mut cursor = Some(index);
    while let Some(i) = cursor {
        if slots[i].topic.base_id() == base_id {
            return true;
        }
        cursor = slots[i].parent;
    }
    false
}

/// Fold the arena into nested nodes. Children always sit at higher indices
/// than their parent, so a reverse sweep sees every child before its parent.
fn assemble(slots: Vec<Slot>) -> Option<TreeNode> {
    let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(slots.len());
    built.resize_with(slots.len(), || None);

    for (index, slot) in slots.into_iter().enumerate().rev() {
        let children = slot
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[index] = Some(TreeNode::new(slot.topic, slot.has_children, children));
    }

    built.into_iter().next().flatten()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
