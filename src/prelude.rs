//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for wiring the detection engine into a request handler.
//!
//! # Usage
//!
//! ```rust
//! use veritext::prelude::*;
//! ```

// Core types
pub use crate::Error;
pub use crate::ErrorCategory;
pub use crate::Result;

// Quota gate
pub use crate::quota::{
    AccountId, Caller, Decision, MemoryUsageStore, QuotaConfig, QuotaGate, UsageAccount,
    UsageStore,
};

// Report rendering
pub use crate::report::{
    REPORT_FILENAME, REPORT_MIME_TYPE, RenderRequest, RenderedReport, ReportRenderer, ReportTheme,
};

// Verdict
pub use crate::verdict::{Confidence, Label, Score};

// Word counting
pub use crate::words;
