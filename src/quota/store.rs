//! Usage-account storage backends.
//!
//! The gate talks to storage through [`UsageStore`]; the contract that
//! matters is that [`UsageStore::try_consume`] is one atomic conditional
//! increment, never a read followed by a separate write. Two concurrent
//! requests that would jointly overshoot the cap must not both pass on
//! stale reads.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::QuotaResult;

/// Opaque identifier for a registered caller's usage account.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    /// Generate a fresh random account id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier from the session layer.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A registered caller's persisted consumption record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageAccount {
    pub account_id: AccountId,
    /// Subscribed accounts bypass the free-tier cap entirely.
    pub subscribed: bool,
    /// Cumulative words consumed this billing cycle. The gate only ever
    /// increments; resets belong to the billing cycle, not to requests.
    pub words_consumed: u64,
}

impl UsageAccount {
    /// Fresh free-tier account with nothing consumed.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            subscribed: false,
            words_consumed: 0,
        }
    }

    pub fn with_subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = subscribed;
        self
    }

    pub fn with_words_consumed(mut self, words_consumed: u64) -> Self {
        self.words_consumed = words_consumed;
        self
    }
}

/// Outcome of one conditional increment against an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The words fit under the cap and were recorded; `total` is the new
    /// cumulative consumption.
    Consumed { total: u64 },
    /// Recording would overshoot the cap. Nothing was written; `consumed`
    /// is the untouched total.
    Exceeded { consumed: u64 },
    /// No account exists under this id.
    NotFound,
}

/// Trait for usage-account storage backends.
#[async_trait::async_trait]
pub trait UsageStore: Send + Sync {
    fn name(&self) -> &str;

    /// Look up an account record.
    async fn fetch(&self, account: &AccountId) -> QuotaResult<Option<UsageAccount>>;

    /// Add `words` to the account's consumption iff the new total stays at
    /// or under `cap`. Check and increment must observe the same stored
    /// value.
    async fn try_consume(
        &self,
        account: &AccountId,
        words: u64,
        cap: u64,
    ) -> QuotaResult<ConsumeOutcome>;
}

/// In-memory usage store (for testing and single-instance deployments).
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    accounts: Arc<DashMap<AccountId, StoredAccount>>,
}

#[derive(Debug)]
struct StoredAccount {
    subscribed: bool,
    words_consumed: AtomicU64,
}

impl MemoryUsageStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account record.
    pub fn insert(&self, account: UsageAccount) {
        self.accounts.insert(
            account.account_id,
            StoredAccount {
                subscribed: account.subscribed,
                words_consumed: AtomicU64::new(account.words_consumed),
            },
        );
    }

    /// Remove an account. Returns `true` if one existed.
    pub fn remove(&self, account: &AccountId) -> bool {
        self.accounts.remove(account).is_some()
    }

    /// Number of stored accounts.
    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    /// Zero an account's consumption, as a billing-cycle rollover would.
    /// Returns `true` if the account existed.
    pub fn reset_usage(&self, account: &AccountId) -> bool {
        match self.accounts.get(account) {
            Some(entry) => {
                entry.words_consumed.store(0, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl UsageStore for MemoryUsageStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, account: &AccountId) -> QuotaResult<Option<UsageAccount>> {
        Ok(self.accounts.get(account).map(|entry| UsageAccount {
            account_id: account.clone(),
            subscribed: entry.subscribed,
            words_consumed: entry.words_consumed.load(Ordering::Relaxed),
        }))
    }

    async fn try_consume(
        &self,
        account: &AccountId,
        words: u64,
        cap: u64,
    ) -> QuotaResult<ConsumeOutcome> {
        let Some(entry) = self.accounts.get(account) else {
            return Ok(ConsumeOutcome::NotFound);
        };

        // CAS loop: the cap check and the increment use the same observed
        // value, so concurrent callers cannot both pass on a stale read.
        loop {
            let current = entry.words_consumed.load(Ordering::Relaxed);
            let total = current.saturating_add(words);
            if total > cap {
                return Ok(ConsumeOutcome::Exceeded { consumed: current });
            }
            if entry
                .words_consumed
                .compare_exchange_weak(current, total, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(ConsumeOutcome::Consumed { total });
            }
        }
    }
}

/// Factory for usage-store backends.
pub struct UsageStoreFactory;

impl UsageStoreFactory {
    /// Create a memory usage store.
    pub fn memory() -> Arc<dyn UsageStore> {
        Arc::new(MemoryUsageStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(id: &str, consumed: u64) -> MemoryUsageStore {
        let store = MemoryUsageStore::new();
        store.insert(UsageAccount::new(AccountId::from(id)).with_words_consumed(consumed));
        store
    }

    #[tokio::test]
    async fn test_fetch_missing_account() {
        let store = MemoryUsageStore::new();
        let record = store.fetch(&AccountId::from("ghost")).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let store = seeded("acct-1", 42);
        let record = store.fetch(&AccountId::from("acct-1")).await.unwrap().unwrap();
        assert_eq!(record.words_consumed, 42);
        assert!(!record.subscribed);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_consume_within_cap() {
        let store = seeded("acct-1", 200);
        let outcome = store
            .try_consume(&AccountId::from("acct-1"), 50, 250)
            .await
            .unwrap();
        assert_eq!(outcome, ConsumeOutcome::Consumed { total: 250 });
    }

    #[tokio::test]
    async fn test_consume_exactly_at_cap_is_allowed() {
        let store = seeded("acct-1", 0);
        let outcome = store
            .try_consume(&AccountId::from("acct-1"), 250, 250)
            .await
            .unwrap();
        assert_eq!(outcome, ConsumeOutcome::Consumed { total: 250 });
    }

    #[tokio::test]
    async fn test_consume_over_cap_mutates_nothing() {
        let store = seeded("acct-1", 250);
        let id = AccountId::from("acct-1");
        let outcome = store.try_consume(&id, 1, 250).await.unwrap();
        assert_eq!(outcome, ConsumeOutcome::Exceeded { consumed: 250 });

        let record = store.fetch(&id).await.unwrap().unwrap();
        assert_eq!(record.words_consumed, 250);
    }

    #[tokio::test]
    async fn test_consume_missing_account() {
        let store = MemoryUsageStore::new();
        let outcome = store
            .try_consume(&AccountId::from("ghost"), 10, 250)
            .await
            .unwrap();
        assert_eq!(outcome, ConsumeOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_zero_word_consume_on_full_account() {
        let store = seeded("acct-1", 250);
        let outcome = store
            .try_consume(&AccountId::from("acct-1"), 0, 250)
            .await
            .unwrap();
        assert_eq!(outcome, ConsumeOutcome::Consumed { total: 250 });
    }

    #[tokio::test]
    async fn test_reset_usage() {
        let store = seeded("acct-1", 250);
        let id = AccountId::from("acct-1");
        assert!(store.reset_usage(&id));
        let record = store.fetch(&id).await.unwrap().unwrap();
        assert_eq!(record.words_consumed, 0);
        assert!(!store.reset_usage(&AccountId::from("ghost")));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = seeded("acct-1", 0);
        assert!(store.remove(&AccountId::from("acct-1")));
        assert!(!store.remove(&AccountId::from("acct-1")));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consume_never_overshoots() {
        let store = Arc::new(seeded("acct-1", 0));
        let id = AccountId::from("acct-1");

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store.try_consume(&id, 25, 250).await.unwrap()
            }));
        }

        let mut consumed = 0;
        for handle in handles {
            if let ConsumeOutcome::Consumed { .. } = handle.await.unwrap() {
                consumed += 1;
            }
        }

        assert_eq!(consumed, 10);
        let record = store.fetch(&id).await.unwrap().unwrap();
        assert_eq!(record.words_consumed, 250);
    }
}
