//! Undirected neighbor relation over the topic hierarchy.
//!
//! A topic's neighbors are its parent followed by its children in store
//! order. That order decides which shortest path BFS reports when several
//! tie.
//!
//! Under the latest policy the parent edge is a single topic. With every
//! version in play, children are matched against the parent's base id, so
//! every version of a base lists the same children; the parent edge
//! mirrors that and yields every version of the parent's base. This keeps
//! the relation symmetric, and with it BFS distances.

use std::collections::HashSet;

use crate::graph::resolver::TopicResolver;
use crate::store::{StoreResult, TopicStore};
use crate::types::{Topic, TopicFilter};

/// Computes graph neighbors of a topic under a version policy.
pub struct NeighborResolver<'a, S: ?Sized> {
    store: &'a S,
    resolver: TopicResolver<'a, S>,
}

impl<'a, S: TopicStore + ?Sized> NeighborResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            resolver: TopicResolver::new(store),
        }
    }

    /// Parent first (if any), then children; deduplicated by id.
    pub fn neighbors(&self, topic: &Topic, only_latest: bool) -> StoreResult<Vec<Topic>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        if let Some(ref parent_id) = topic.parent_topic_id {
            for parent in self.resolve_parents(parent_id, only_latest)? {
                if seen.insert(parent.id.clone()) {
                    out.push(parent);
                }
            }
        }

        let base_id = topic.base_id();
        let by_base = self
            .store
            .find(&TopicFilter::children_of(base_id).latest_if(only_latest))?;
        let by_version = if topic.id != base_id {
            self.store
                .find(&TopicFilter::children_of(topic.id.as_str()).latest_if(only_latest))?
        } else {
            Vec::new()
        };

        for child in by_base.into_iter().chain(by_version) {
            if seen.insert(child.id.clone()) {
                out.push(child);
            }
        }
        Ok(out)
    }

    /// Resolve a parent reference to the topics on the other end of the
    /// parent edge.
    ///
    /// TODO: parent references are inconsistently version ids or base ids in
    /// older data; drop the version-id interpretation once records are
    /// migrated to base ids only.
    fn resolve_parents(&self, parent_id: &str, only_latest: bool) -> StoreResult<Vec<Topic>> {
        let direct = self.store.find_by_id(parent_id)?;
        if !only_latest {
            // The literal row first, then the versions sharing the base.
            let versions = self.store.find(&TopicFilter::versions_of(parent_id))?;
            let mut parents: Vec<Topic> = direct.into_iter().collect();
            for version in versions {
                if parents.iter().all(|p| p.id != version.id) {
                    parents.push(version);
                }
            }
            return Ok(parents);
        }
        let parent = match direct {
            Some(direct) if direct.is_latest => Some(direct),
            Some(stale) => self
                .resolver
                .resolve_by_base_id(stale.base_id(), true)?
                .or(Some(stale)),
            None => self.resolver.resolve_by_base_id(parent_id, true)?,
        };
        Ok(parent.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
