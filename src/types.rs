//! Core domain types for the topic graph.
//!
//! A [`Topic`] is one *version* of a logical topic. Versions of the same
//! logical topic share a `base_topic_id`; children reference their parent by
//! that base identity, not by a version id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// One stored version of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique per version.
    pub id: String,
    /// Stable across versions; equals `id` for version 1. Historical records
    /// may lack it, in which case [`Topic::base_id`] falls back to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_topic_id: Option<String>,
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: u32,
    pub is_latest: bool,
    /// Base identity of the parent topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_topic_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Topic {
    /// The version-independent identity of this topic.
    pub fn base_id(&self) -> &str {
        self.base_topic_id.as_deref().unwrap_or(&self.id)
    }

    /// Whether this record has no parent (a forest root).
    pub fn is_root(&self) -> bool {
        self.parent_topic_id.is_none()
    }

    /// Build a first-version topic with `id` doubling as its base identity.
    ///
    /// Mostly useful for seeding stores in tests and imports.
    pub fn first_version(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_topic_id: Option<&str>,
    ) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            base_topic_id: Some(id.clone()),
            id,
            name: name.into(),
            content: String::new(),
            description: None,
            version: 1,
            is_latest: true,
            parent_topic_id: parent_topic_id.map(str::to_string),
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    /// Derive the next version of `self` under a new version id.
    ///
    /// The returned record is latest; flipping `self.is_latest` in the store
    /// is the caller's job.
    pub fn next_version(&self, id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            base_topic_id: Some(self.base_id().to_string()),
            version: self.version + 1,
            is_latest: true,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// TopicFilter
// ---------------------------------------------------------------------------

/// How a [`TopicFilter`] constrains `parent_topic_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentMatch {
    /// No constraint.
    #[default]
    Any,
    /// The topic has no parent.
    Absent,
    /// The topic's parent equals this identifier exactly.
    Is(String),
}

/// Exact-match conjunction over topic fields, as accepted by
/// [`TopicStore::find`](crate::store::TopicStore::find).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    pub base_topic_id: Option<String>,
    pub parent: ParentMatch,
    pub is_latest: Option<bool>,
}

impl TopicFilter {
    /// Match every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Topics whose parent is `parent_id`.
    pub fn children_of(parent_id: impl Into<String>) -> Self {
        Self {
            parent: ParentMatch::Is(parent_id.into()),
            ..Self::default()
        }
    }

    /// Topics without a parent.
    pub fn roots() -> Self {
        Self {
            parent: ParentMatch::Absent,
            ..Self::default()
        }
    }

    /// Every version sharing `base_id`.
    pub fn versions_of(base_id: impl Into<String>) -> Self {
        Self {
            base_topic_id: Some(base_id.into()),
            ..Self::default()
        }
    }

    /// Restrict to latest versions when `only_latest` is set; leave the
    /// filter unconstrained on `is_latest` otherwise.
    pub fn latest_if(mut self, only_latest: bool) -> Self {
        self.is_latest = only_latest.then_some(true);
        self
    }

    /// Does `topic` satisfy every constraint of this filter?
    pub fn matches(&self, topic: &Topic) -> bool {
        if let Some(ref base) = self.base_topic_id {
            if topic.base_id() != base {
                return false;
            }
        }
        match &self.parent {
            ParentMatch::Any => {}
            ParentMatch::Absent => {
                if topic.parent_topic_id.is_some() {
                    return false;
                }
            }
            ParentMatch::Is(parent) => {
                if topic.parent_topic_id.as_deref() != Some(parent.as_str()) {
                    return false;
                }
            }
        }
        if let Some(latest) = self.is_latest {
            if topic.is_latest != latest {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// TopicPatch
// ---------------------------------------------------------------------------

/// Partial update applied by
/// [`TopicStore::update_by_id`](crate::store::TopicStore::update_by_id).
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub description: Option<Option<String>>,
    pub is_latest: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TopicPatch {
    /// A patch that only flips the latest flag.
    pub fn set_latest(is_latest: bool) -> Self {
        Self {
            is_latest: Some(is_latest),
            updated_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Apply this patch to `topic` in place.
    pub fn apply(&self, topic: &mut Topic) {
        if let Some(ref name) = self.name {
            topic.name.clone_from(name);
        }
        if let Some(ref content) = self.content {
            topic.content.clone_from(content);
        }
        if let Some(ref description) = self.description {
            topic.description.clone_from(description);
        }
        if let Some(is_latest) = self.is_latest {
            topic.is_latest = is_latest;
        }
        if let Some(updated_at) = self.updated_at {
            topic.updated_at = updated_at;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_id_falls_back_to_id() {
        let mut topic = Topic::first_version("t1", "Topic", None);
        assert_eq!(topic.base_id(), "t1");
        topic.base_topic_id = None;
        assert_eq!(topic.base_id(), "t1");
        topic.base_topic_id = Some("root-base".into());
        assert_eq!(topic.base_id(), "root-base");
    }

    #[test]
    fn next_version_keeps_base_and_parent() {
        let v1 = Topic::first_version("t1", "Topic", Some("p"));
        let v2 = v1.next_version("t1-v2");
        assert_eq!(v2.id, "t1-v2");
        assert_eq!(v2.base_id(), "t1");
        assert_eq!(v2.version, 2);
        assert!(v2.is_latest);
        assert_eq!(v2.parent_topic_id.as_deref(), Some("p"));
    }

    #[test]
    fn filter_matches_parent_constraints() {
        let root = Topic::first_version("r", "Root", None);
        let child = Topic::first_version("c", "Child", Some("r"));

        assert!(TopicFilter::roots().matches(&root));
        assert!(!TopicFilter::roots().matches(&child));
        assert!(TopicFilter::children_of("r").matches(&child));
        assert!(!TopicFilter::children_of("x").matches(&child));
        assert!(TopicFilter::all().matches(&root));
    }

    #[test]
    fn filter_latest_if_only_constrains_when_set() {
        let mut stale = Topic::first_version("s", "Stale", None);
        stale.is_latest = false;

        assert!(TopicFilter::all().latest_if(false).matches(&stale));
        assert!(!TopicFilter::all().latest_if(true).matches(&stale));
    }

    #[test]
    fn filter_versions_of_uses_base_identity() {
        let v1 = Topic::first_version("t", "Topic", None);
        let v2 = v1.next_version("t2");
        let other = Topic::first_version("o", "Other", None);

        let filter = TopicFilter::versions_of("t");
        assert!(filter.matches(&v1));
        assert!(filter.matches(&v2));
        assert!(!filter.matches(&other));
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut topic = Topic::first_version("t", "Old", None);
        topic.description = Some("desc".into());
        let patch = TopicPatch {
            name: Some("New".into()),
            description: Some(None),
            ..TopicPatch::default()
        };
        patch.apply(&mut topic);
        assert_eq!(topic.name, "New");
        assert_eq!(topic.description, None);
        assert!(topic.is_latest);
    }

    #[test]
    fn topic_serializes_camel_case() {
        let topic = Topic::first_version("t", "Topic", Some("p"));
        let json = serde_json::to_value(&topic).unwrap();
        assert_eq!(json["baseTopicId"], "t");
        assert_eq!(json["parentTopicId"], "p");
        assert_eq!(json["isLatest"], true);
        assert!(json.get("description").is_none());

        let back: Topic = serde_json::from_value(json).unwrap();
        assert_eq!(back, topic);
    }
}
