//! Record lifecycle: create a topic, derive a new version, delete a
//! childless topic.
//!
//! New versions are written as "unmark old latest, insert new latest". The
//! two writes are not atomic across every store, so readers may briefly see
//! no latest version for a base; [`TopicResolver`] covers that window.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::require_id;
use crate::error::{LookupContext, Result, TopicGraphError};
use crate::graph::resolver::TopicResolver;
use crate::store::TopicStore;
use crate::types::{Topic, TopicFilter, TopicPatch};

/// Input for [`TopicVersioning::create_topic`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Base identity (or any version id) of the parent.
    #[serde(default)]
    pub parent_topic_id: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Field changes carried into a new version. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
}

impl TopicChanges {
    fn into_patch(self) -> TopicPatch {
        TopicPatch {
            name: self.name,
            content: self.content,
            description: self.description,
            ..TopicPatch::default()
        }
    }
}

/// Write operations over a [`TopicStore`].
pub struct TopicVersioning<'a, S: ?Sized> {
    store: &'a S,
    resolver: TopicResolver<'a, S>,
}

impl<'a, S: TopicStore + ?Sized> TopicVersioning<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            resolver: TopicResolver::new(store),
        }
    }

    /// Insert version 1 of a new logical topic.
    ///
    /// The parent reference is normalized to the parent's base identity.
    pub fn create_topic(&self, input: NewTopic) -> Result<Topic> {
        let name = require_name(&input.name)?;
        let parent_topic_id = match input.parent_topic_id {
            Some(ref parent) => Some(self.parent_base_id(require_id("parentTopicId", parent)?)?),
            None => None,
        };

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let topic = Topic {
            base_topic_id: Some(id.clone()),
            id,
            name,
            content: input.content,
            description: input.description,
            version: 1,
            is_latest: true,
            parent_topic_id,
            created_at: now,
            updated_at: now,
            created_by: input.created_by,
        };
        let created = self.store.create(topic).during("create topic")?;
        tracing::info!(id = %created.id, "created topic");
        Ok(created)
    }

    /// Derive a new latest version from the current latest version of the
    /// logical topic `id` belongs to.
    pub fn create_new_version(&self, id: &str, changes: TopicChanges) -> Result<Topic> {
        let id = require_id("id", id)?;
        if let Some(ref name) = changes.name {
            require_name(name)?;
        }
        let current = self
            .resolver
            .resolve_topic(id, true)
            .during("resolve current version")?
            .ok_or_else(|| TopicGraphError::NotFound(id.to_string()))?;

        let mut next = current.next_version(Uuid::new_v4().to_string());
        changes.into_patch().apply(&mut next);

        self.store
            .update_by_id(&current.id, &TopicPatch::set_latest(false))
            .during("unmark previous latest")?;

        match self.store.create(next) {
            Ok(created) => {
                tracing::info!(
                    base = created.base_id(),
                    version = created.version,
                    "created topic version"
                );
                Ok(created)
            }
            Err(e) => {
                if let Err(restore) = self
                    .store
                    .update_by_id(&current.id, &TopicPatch::set_latest(true))
                {
                    tracing::warn!(id = %current.id, "failed to restore latest flag: {restore}");
                }
                Err(TopicGraphError::Lookup {
                    operation: "insert new version",
                    source: e,
                })
            }
        }
    }

    /// Delete every version of the logical topic `id` belongs to.
    ///
    /// Refused with [`TopicGraphError::HasChildren`] while any topic points at
    /// its base identity or one of its version ids. Returns how many version
    /// records were removed.
    pub fn delete_topic(&self, id: &str) -> Result<usize> {
        let id = require_id("id", id)?;
        let topic = self
            .store
            .find_by_id(id)
            .during("resolve topic to delete")?
            .ok_or_else(|| TopicGraphError::NotFound(id.to_string()))?;
        let base_id = topic.base_id().to_string();

        let versions = self
            .store
            .find(&TopicFilter::versions_of(base_id.as_str()))
            .during("list topic versions")?;

        let mut referenced = vec![base_id.clone()];
        referenced.extend(versions.iter().map(|v| v.id.clone()).filter(|v| *v != base_id));
        for parent in &referenced {
            let children = self
                .store
                .find(&TopicFilter::children_of(parent.as_str()))
                .during("check for children")?;
            if !children.is_empty() {
                return Err(TopicGraphError::HasChildren(id.to_string()));
            }
        }

        let mut deleted = 0;
        for version in &versions {
            if self
                .store
                .delete_by_id(&version.id)
                .during("delete topic version")?
            {
                deleted += 1;
            }
        }
        tracing::info!(base = %base_id, deleted, "deleted topic");
        Ok(deleted)
    }

    fn parent_base_id(&self, parent: &str) -> Result<String> {
        if let Some(found) = self
            .store
            .find_by_id(parent)
            .during("resolve parent topic")?
        {
            return Ok(found.base_id().to_string());
        }
        match self
            .resolver
            .resolve_by_base_id(parent, false)
            .during("resolve parent topic by base id")?
        {
            Some(found) => Ok(found.base_id().to_string()),
            None => Err(TopicGraphError::Validation(format!(
                "parent topic {parent} does not exist"
            ))),
        }
    }
}

fn require_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TopicGraphError::Validation("name is required".to_string()));
    }
    Ok(trimmed.to_string())
}
