//! Version resolution: turn "the topic the caller means" into a record.
//!
//! Two policies exist. With `only_latest = false` an id names exactly one
//! version. With `only_latest = true` any version id of a logical topic is
//! redirected to that topic's current version; passing a stale id is not an
//! error.

use crate::store::{StoreResult, TopicStore};
use crate::types::{Topic, TopicFilter};

/// Read helpers over a [`TopicStore`] that apply a version policy.
pub struct TopicResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: TopicStore + ?Sized> TopicResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve a version id under the given policy.
    pub fn resolve_topic(&self, id: &str, only_latest: bool) -> StoreResult<Option<Topic>> {
        let Some(topic) = self.store.find_by_id(id)? else {
            return Ok(None);
        };
        if !only_latest || topic.is_latest {
            return Ok(Some(topic));
        }
        let latest = self.latest_of(topic.base_id())?;
        Ok(latest.or(Some(topic)))
    }

    /// Resolve a base identity under the given policy.
    ///
    /// `only_latest = false` yields the highest-numbered version.
    pub fn resolve_by_base_id(&self, base_id: &str, only_latest: bool) -> StoreResult<Option<Topic>> {
        if only_latest {
            self.latest_of(base_id)
        } else {
            self.highest_version_of(base_id)
        }
    }

    /// The version flagged latest for `base_id`.
    ///
    /// A flip between unmarking the old latest and inserting the new one can
    /// leave zero flagged versions; the highest-numbered version stands in.
    /// If several are flagged, the highest-numbered of those wins.
    fn latest_of(&self, base_id: &str) -> StoreResult<Option<Topic>> {
        let flagged = self
            .store
            .find(&TopicFilter::versions_of(base_id).latest_if(true))?;
        match flagged.into_iter().max_by_key(|t| t.version) {
            Some(topic) => Ok(Some(topic)),
            None => self.highest_version_of(base_id),
        }
    }

    fn highest_version_of(&self, base_id: &str) -> StoreResult<Option<Topic>> {
        let versions = self.store.find(&TopicFilter::versions_of(base_id))?;
        Ok(versions.into_iter().max_by_key(|t| t.version))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
