//! # veritext
//!
//! Core engine for the VeriText AI content detector.
//!
//! This crate owns the two halves of the product that must never disagree
//! with each other: the free-tier quota gate that decides whether an
//! analysis request may run, and the paginated PDF renderer that turns a
//! finished analysis into a downloadable report. Model calls, HTTP, and
//! session resolution live in their own services; they hand this engine a
//! caller, a word count, and a score.
//!
//! ## Quota gate
//!
//! ```rust
//! use std::sync::Arc;
//! use veritext::{Caller, MemoryUsageStore, QuotaGate};
//!
//! # async fn example() -> Result<(), veritext::Error> {
//! let gate = QuotaGate::new(Arc::new(MemoryUsageStore::new()));
//!
//! let decision = gate.evaluate(&Caller::anonymous(), 120).await?;
//! assert!(decision.is_allowed());
//!
//! let decision = gate.evaluate(&Caller::anonymous(), 251).await?;
//! assert!(!decision.is_allowed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Report rendering
//!
//! ```rust
//! use veritext::{RenderRequest, ReportRenderer, Score};
//!
//! let request = RenderRequest::new("Paste the text you want analyzed.", Score::new(12.0))?;
//! let report = ReportRenderer::default().render(&request)?;
//! assert!(report.bytes().starts_with(b"%PDF-"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod prelude;
pub mod quota;
pub mod report;
pub mod verdict;
pub mod words;

// Re-exports for convenience
pub use quota::{
    AccountId, Caller, DEFAULT_FREE_TIER_WORD_CAP, Decision, MemoryUsageStore, QuotaConfig,
    QuotaError, QuotaGate, QuotaResult, UsageAccount, UsageStore, UsageStoreFactory,
};
pub use report::{
    Font, PageText, PlacedLine, REPORT_FILENAME, REPORT_MIME_TYPE, RenderRequest, RenderedReport,
    ReportError, ReportRenderer, ReportResult, ReportTheme,
};
pub use verdict::{Confidence, Label, Score};

/// Error type for veritext operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Submitted text contains no words. Rejected before quota evaluation
    /// or rendering starts.
    #[error("Empty input: the submitted text contains no words")]
    EmptyInput,

    /// Quota evaluation or usage accounting failed.
    #[error("Quota error: {0}")]
    Quota(#[from] quota::QuotaError),

    /// Report rendering failed.
    #[error("Report error: {0}")]
    Report(#[from] report::ReportError),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is unusable (empty input)
    InvalidInput,
    /// The caller's identity has no backing account
    UnknownAccount,
    /// Storage or rendering resources failed; retrying may succeed
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyInput => ErrorCategory::InvalidInput,
            Error::Quota(quota::QuotaError::AccountNotFound { .. }) => {
                ErrorCategory::UnknownAccount
            }
            Error::Quota(quota::QuotaError::Storage { .. }) | Error::Report(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// True when the failure should be presented to the caller as a
    /// rejection of their request rather than a server fault.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::InvalidInput | ErrorCategory::UnknownAccount
        )
    }

    pub fn is_internal(&self) -> bool {
        self.category() == ErrorCategory::Internal
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Render a report with the default theme in one call.
pub fn render_report(body_text: &str, score: Score) -> Result<RenderedReport> {
    let request = RenderRequest::new(body_text, score)?;
    let report = ReportRenderer::default().render(&request)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyInput;
        assert!(err.to_string().contains("no words"));

        let err = Error::from(quota::QuotaError::AccountNotFound {
            account: AccountId::from("acct-1"),
        });
        assert!(err.to_string().contains("acct-1"));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(Error::EmptyInput.category(), ErrorCategory::InvalidInput);
        assert!(Error::EmptyInput.is_rejection());

        let not_found = Error::from(quota::QuotaError::AccountNotFound {
            account: AccountId::from("acct-1"),
        });
        assert_eq!(not_found.category(), ErrorCategory::UnknownAccount);
        assert!(not_found.is_rejection());

        let storage = Error::from(quota::QuotaError::storage("connection lost"));
        assert!(storage.is_internal());

        let render = Error::from(report::ReportError::resource_init("logo image", "bad data"));
        assert!(render.is_internal());
        assert!(!render.is_rejection());
    }

    #[test]
    fn test_render_report_shortcut() {
        let report = render_report("a few plain words", Score::new(20.0)).unwrap();
        assert_eq!(report.page_count(), 1);

        let err = render_report("   ", Score::new(20.0)).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }
}
