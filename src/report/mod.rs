//! Paginated PDF report rendering.
//!
//! A report is rendered in two phases. The pure layout core sanitizes the
//! body, wraps it with real font metrics, and assigns every line a page and
//! position; the renderer then replays that plan as draw calls and adds the
//! front matter and per-page footers. Layout never touches the canvas, so
//! wrap boundaries and page counts can be asserted without parsing PDF
//! bytes.
//!
//! ```rust
//! use veritext::report::{RenderRequest, ReportRenderer};
//! use veritext::verdict::Score;
//!
//! let request = RenderRequest::new("Paste the text you want analyzed.", Score::new(12.0))?;
//! let report = ReportRenderer::default().render(&request)?;
//! assert!(report.bytes().starts_with(b"%PDF-"));
//! assert_eq!(report.page_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod fonts;
pub mod layout;
pub mod renderer;
pub mod theme;

pub use fonts::Font;
pub use layout::{PageText, PlacedLine};
pub use renderer::{
    REPORT_FILENAME, REPORT_MIME_TYPE, RenderRequest, RenderedReport, ReportRenderer,
};
pub use theme::ReportTheme;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// A canvas, font, or image resource could not be initialized. The
    /// render is abandoned whole; no partial document is ever returned.
    #[error("Failed to initialize {resource}: {message}")]
    ResourceInit {
        resource: &'static str,
        message: String,
    },
}

impl ReportError {
    pub(crate) fn resource_init(resource: &'static str, err: impl std::fmt::Display) -> Self {
        ReportError::ResourceInit {
            resource,
            message: err.to_string(),
        }
    }
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::resource_init("logo image", "bad magic bytes");
        assert_eq!(
            err.to_string(),
            "Failed to initialize logo image: bad magic bytes"
        );
    }
}
