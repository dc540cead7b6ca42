//! # Notification Log
//!
//! Capped, newest-first list of notifications.
//!
//! ```text
//!   push(n101)
//!      │
//!      ▼
//!   [n101, n100, n99, ... , n2]  ──►  n1 evicted (capacity 100)
//!     ▲ newest                ▲ oldest
//! ```
//!
//! The log also hands out notification ids. An id is the creation time in
//! milliseconds, bumped past the last id issued so two notifications created
//! in the same millisecond still differ and still sort by creation.

use chrono::{DateTime, Utc};

use crate::types::{AlertPayload, Notification, NotificationCategory};
use crate::NOTIFICATION_LOG_CAPACITY;

#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: Vec<Notification>,
    capacity: usize,
    last_id: i64,
}

impl Default for NotificationLog {
    fn default() -> Self {
        NotificationLog::new(NOTIFICATION_LOG_CAPACITY)
    }
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        NotificationLog {
            entries: Vec::new(),
            capacity,
            last_id: 0,
        }
    }

    /// Rebuilds a log from persisted entries.
    ///
    /// Entries are put back in newest-first order and cut to `capacity`.
    pub fn from_entries(mut entries: Vec<Notification>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(capacity);
        let last_id = entries.first().map_or(0, |n| n.id);
        NotificationLog {
            entries,
            capacity,
            last_id,
        }
    }

    /// Next notification id for something created at `now`.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Builds a notification stamped `now` with a fresh id.
    pub fn compose(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
        payload: Option<AlertPayload>,
        now: DateTime<Utc>,
    ) -> Notification {
        Notification {
            id: self.next_id(now),
            title: title.into(),
            message: message.into(),
            category,
            timestamp: now,
            payload,
        }
    }

    /// Inserts at the front. Returns the evicted entry when over capacity.
    pub fn push(&mut self, notification: Notification) -> Option<Notification> {
        self.last_id = self.last_id.max(notification.id);
        self.entries.insert(0, notification);
        if self.entries.len() > self.capacity {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Removes every entry. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first, optionally restricted to one category.
    pub fn filter(&self, category: Option<NotificationCategory>) -> Vec<Notification> {
        self.entries
            .iter()
            .filter(|n| category.map_or(true, |c| n.category == c))
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
