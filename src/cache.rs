use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::{Group, Notification, Prediction};

/// Entities that can live in an [`EntityCache`].
pub trait Keyed {
    fn cache_key(&self) -> Option<&str>;
}

impl Keyed for Notification {
    fn cache_key(&self) -> Option<&str> {
        Some(&self.message_id)
    }
}

impl Keyed for Group {
    fn cache_key(&self) -> Option<&str> {
        Some(&self.group_id)
    }
}

impl Keyed for Prediction {
    fn cache_key(&self) -> Option<&str> {
        self.key()
    }
}

/// Server-truth cache keyed by entity id.
///
/// Mutations never patch entries in place: callers invalidate what they
/// touched and refetch. Iteration follows the order of the last fetch.
#[derive(Debug, Clone)]
pub struct EntityCache<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
    stale: HashSet<String>,
    all_stale: bool,
    fetched_at: Option<DateTime<Utc>>,
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            stale: HashSet::new(),
            all_stale: false,
            fetched_at: None,
        }
    }
}

impl<T: Keyed> EntityCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with a fresh listing. Entities without an id are dropped.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.order.clear();
        self.entries.clear();
        for item in items {
            let Some(key) = item.cache_key().map(str::to_string) else {
                tracing::debug!("Dropping cache entry without id");
                continue;
            };
            if !self.entries.contains_key(&key) {
                self.order.push(key.clone());
            }
            self.entries.insert(key, item);
        }
        self.stale.clear();
        self.all_stale = false;
        self.fetched_at = Some(Utc::now());
    }

    /// Store a freshly fetched single entity and clear its stale mark.
    pub fn put(&mut self, item: T) {
        let Some(key) = item.cache_key().map(str::to_string) else {
            return;
        };
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.stale.remove(&key);
        self.entries.insert(key, item);
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.order.retain(|k| k != key);
        self.stale.remove(key);
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|k| self.entries.get(k))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn invalidate(&mut self, key: &str) {
        self.stale.insert(key.to_string());
    }

    pub fn invalidate_all(&mut self) {
        self.all_stale = true;
    }

    pub fn is_stale(&self, key: &str) -> bool {
        self.all_stale || self.stale.contains(key)
    }

    /// Ids invalidated individually and not yet refetched.
    pub fn stale_keys(&self) -> Vec<String> {
        self.stale.iter().cloned().collect()
    }

    /// True before the first fetch and after any invalidation.
    pub fn needs_refresh(&self) -> bool {
        self.fetched_at.is_none() || self.all_stale || !self.stale.is_empty()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationStatus;

    fn note(id: &str, status: NotificationStatus) -> Notification {
        Notification {
            message_id: id.into(),
            title: None,
            body: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn replace_all_keeps_fetch_order() {
        let mut cache = EntityCache::new();
        assert!(cache.needs_refresh());

        cache.replace_all(vec![
            note("b", NotificationStatus::Unread),
            note("a", NotificationStatus::Read),
        ]);

        let ids: Vec<_> = cache.values().map(|n| n.message_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(!cache.needs_refresh());
    }

    #[test]
    fn invalidation_marks_stale_until_refetched() {
        let mut cache = EntityCache::new();
        cache.replace_all(vec![note("a", NotificationStatus::Unread)]);

        cache.invalidate("a");
        assert!(cache.is_stale("a"));
        assert!(cache.needs_refresh());

        cache.put(note("a", NotificationStatus::Read));
        assert!(!cache.is_stale("a"));
        assert_eq!(cache.get("a").unwrap().status, NotificationStatus::Read);
    }

    #[test]
    fn invalidate_all_then_replace() {
        let mut cache = EntityCache::new();
        cache.replace_all(vec![note("a", NotificationStatus::Unread)]);
        cache.invalidate_all();
        assert!(cache.is_stale("a"));

        cache.replace_all(vec![note("c", NotificationStatus::Unread)]);
        assert!(!cache.needs_refresh());
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 1);
    }
}
