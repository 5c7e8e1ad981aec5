//! Free-tier quota evaluation.
//!
//! One gate sits in front of every analysis request and applies the tier
//! rules in a fixed order: subscription first, then the anonymous
//! per-request cap, then the registered cumulative cap. Only the last rule
//! touches storage, and it does so through a single conditional increment
//! so a denial never consumes quota.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::store::{AccountId, ConsumeOutcome, UsageStore};
use super::{QuotaError, QuotaResult};

/// Words a non-subscribed caller may spend: per request when anonymous,
/// cumulative per billing cycle when registered.
pub const DEFAULT_FREE_TIER_WORD_CAP: u64 = 250;

const REASON_SUBSCRIBED: &str = "Pro user, unlimited";
const REASON_WITHIN_FREE_LIMIT: &str = "Within free limit";
const REASON_QUOTA_EXHAUSTED: &str = "quota exhausted";

/// Quota gate tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Free-tier word cap. Applies per request to anonymous callers and
    /// cumulatively to registered ones.
    pub free_tier_word_cap: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_tier_word_cap: DEFAULT_FREE_TIER_WORD_CAP,
        }
    }
}

impl QuotaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word_cap(mut self, cap: u64) -> Self {
        self.free_tier_word_cap = cap;
        self
    }
}

/// Caller identity as resolved by the session layer.
///
/// `Default` is the anonymous caller: no identity, no subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    identity: Option<AccountId>,
    subscribed: bool,
}

impl Caller {
    /// A caller with no account. Usage is never recorded for these.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller with a resolved account id, free tier by default.
    pub fn registered(account: impl Into<AccountId>) -> Self {
        Self {
            identity: Some(account.into()),
            subscribed: false,
        }
    }

    pub fn with_subscription(mut self, subscribed: bool) -> Self {
        self.subscribed = subscribed;
        self
    }

    pub fn identity(&self) -> Option<&AccountId> {
        self.identity.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

/// Verdict of one quota evaluation. The reason is surfaced to the end user
/// verbatim on denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allow {
        reason: String,
        /// New cumulative total for registered free-tier callers. `None`
        /// when nothing was recorded (anonymous or subscribed).
        words_consumed: Option<u64>,
    },
    Deny {
        reason: String,
    },
}

impl Decision {
    fn allow(reason: impl Into<String>, words_consumed: Option<u64>) -> Self {
        Decision::Allow {
            reason: reason.into(),
            words_consumed,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Decision::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            Decision::Allow { reason, .. } | Decision::Deny { reason } => reason,
        }
    }
}

/// Applies the free-tier rules and charges registered accounts.
///
/// The storage handle is injected so request handlers, background jobs, and
/// tests can each decide which backend the gate runs against.
pub struct QuotaGate {
    store: Arc<dyn UsageStore>,
    config: QuotaConfig,
}

impl QuotaGate {
    /// Create a gate over `store` with the default cap.
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self {
            store,
            config: QuotaConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QuotaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Decide whether a request spending `words` may proceed.
    ///
    /// Rules, in order:
    /// 1. Subscribed callers are allowed unconditionally; nothing is
    ///    recorded.
    /// 2. Anonymous callers are allowed iff `words` fits the per-request
    ///    cap; nothing is recorded either way.
    /// 3. Registered free-tier callers are charged through one conditional
    ///    increment: allowed (and recorded) iff the new cumulative total
    ///    stays at or under the cap.
    ///
    /// A registered caller whose account is missing from the store is an
    /// error, not a denial; the session layer handed over an identity the
    /// accounting layer does not know.
    pub async fn evaluate(&self, caller: &Caller, words: u64) -> QuotaResult<Decision> {
        let cap = self.config.free_tier_word_cap;

        if caller.is_subscribed() {
            tracing::debug!(words, "Subscribed caller, cap bypassed");
            return Ok(Decision::allow(REASON_SUBSCRIBED, None));
        }

        let Some(account) = caller.identity() else {
            if words > cap {
                tracing::info!(words, cap, "Anonymous request over free-tier cap");
                return Ok(Decision::deny(format!(
                    "Free trial limited to {cap} words per request."
                )));
            }
            tracing::debug!(words, cap, "Anonymous request within free-tier cap");
            return Ok(Decision::allow(REASON_WITHIN_FREE_LIMIT, None));
        };

        match self.store.try_consume(account, words, cap).await? {
            ConsumeOutcome::Consumed { total } => {
                tracing::debug!(
                    account = %account,
                    store = self.store.name(),
                    words,
                    total,
                    "Free-tier usage recorded"
                );
                Ok(Decision::allow(REASON_WITHIN_FREE_LIMIT, Some(total)))
            }
            ConsumeOutcome::Exceeded { consumed } => {
                tracing::info!(
                    account = %account,
                    words,
                    consumed,
                    cap,
                    "Free-tier quota exhausted"
                );
                Ok(Decision::deny(REASON_QUOTA_EXHAUSTED))
            }
            ConsumeOutcome::NotFound => Err(QuotaError::AccountNotFound {
                account: account.clone(),
            }),
        }
    }
}
