//! Free-tier quota gating and usage accounting.
//!
//! Every analysis request passes through a [`QuotaGate`] before any model
//! call or rendering happens. The gate never reads-then-writes: registered
//! usage is charged through one conditional increment on the
//! [`UsageStore`], so concurrent requests cannot jointly overshoot the cap
//! and a denied request never consumes quota.
//!
//! ```rust
//! use std::sync::Arc;
//! use veritext::quota::{Caller, MemoryUsageStore, QuotaGate};
//!
//! # async fn example() -> Result<(), veritext::quota::QuotaError> {
//! let gate = QuotaGate::new(Arc::new(MemoryUsageStore::new()));
//! let decision = gate.evaluate(&Caller::anonymous(), 120).await?;
//! assert!(decision.is_allowed());
//! # Ok(())
//! # }
//! ```

pub mod gate;
pub mod store;

pub use gate::{Caller, DEFAULT_FREE_TIER_WORD_CAP, Decision, QuotaConfig, QuotaGate};
pub use store::{
    AccountId, ConsumeOutcome, MemoryUsageStore, UsageAccount, UsageStore, UsageStoreFactory,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuotaError {
    /// The session layer resolved an identity the usage store does not
    /// know. Surfaced as a denial upstream, but distinct from running out
    /// of quota.
    #[error("No usage account found: {account}")]
    AccountNotFound { account: AccountId },

    #[error("Usage store error: {message}")]
    Storage { message: String },
}

impl QuotaError {
    /// Build a storage error from any displayable backend failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        QuotaError::Storage {
            message: err.to_string(),
        }
    }
}

pub type QuotaResult<T> = std::result::Result<T, QuotaError>;
