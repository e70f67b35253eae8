//! Registry of dates being watched for remote changes.
//!
//! Owned by the [`Reconciler`](crate::Reconciler). A subscription only marks
//! a date as interesting; the transport that delivers changes lives outside
//! this crate and feeds them to `Reconciler::apply_remote_change`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use daybook_core::ids::{PREFIX_SUBSCRIPTION, generate_id};
use daybook_core::{CoreError, TaskDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub id: String,
    pub date: TaskDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: BTreeMap<String, Subscription>,
}

impl SubscriptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `date` and return the subscription.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if an ID cannot be generated.
    pub fn register(&mut self, date: TaskDate) -> Result<Subscription, CoreError> {
        let subscription = Subscription {
            id: generate_id(PREFIX_SUBSCRIPTION)?,
            date,
            created_at: Utc::now(),
        };
        self.subscriptions
            .insert(subscription.id.clone(), subscription.clone());
        Ok(subscription)
    }

    /// Remove a subscription. Returns `false` if the ID was unknown.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.subscriptions.remove(id).is_some()
    }

    /// Remove everything, returning how many subscriptions were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        count
    }

    #[must_use]
    pub fn is_watching(&self, date: TaskDate) -> bool {
        self.subscriptions.values().any(|s| s.date == date)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> TaskDate {
        s.parse().unwrap()
    }

    #[test]
    fn register_and_unregister() {
        let mut registry = SubscriptionRegistry::new();
        let sub = registry.register(date("2025-01-29")).unwrap();
        assert!(sub.id.starts_with("wch-"));
        assert!(registry.is_watching(date("2025-01-29")));
        assert!(!registry.is_watching(date("2025-01-30")));

        assert!(registry.unregister(&sub.id));
        assert!(!registry.unregister(&sub.id));
        assert!(registry.is_empty());
    }

    #[test]
    fn two_subscriptions_on_one_date() {
        let mut registry = SubscriptionRegistry::new();
        let first = registry.register(date("2025-01-29")).unwrap();
        registry.register(date("2025-01-29")).unwrap();
        registry.unregister(&first.id);
        assert!(registry.is_watching(date("2025-01-29")));
        assert_eq!(registry.clear(), 1);
        assert!(!registry.is_watching(date("2025-01-29")));
    }
}
