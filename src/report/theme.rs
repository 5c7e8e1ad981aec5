//! Report branding.
//!
//! Everything the renderer stamps on a document that is not derived from
//! the request lives here, injected at construction instead of read from
//! process-global state. Tests and white-label deployments swap a theme;
//! the layout does not change.

/// Visual identity applied to every rendered report.
#[derive(Debug, Clone)]
pub struct ReportTheme {
    /// Product name stamped in the header band and every page footer.
    pub brand_name: String,
    /// Version line shown in the header's right-hand column.
    pub version_tag: String,
    /// Optional JPEG logo for the header band. Decoded and validated at
    /// render time; an undecodable logo fails the render before any page
    /// is produced.
    pub logo_jpeg: Option<Vec<u8>>,
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self {
            brand_name: "VeriText".to_string(),
            version_tag: format!("Version {}", env!("CARGO_PKG_VERSION")),
            logo_jpeg: None,
        }
    }
}

impl ReportTheme {
    /// Default theme under a different product name.
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            ..Self::default()
        }
    }

    pub fn with_version_tag(mut self, version_tag: impl Into<String>) -> Self {
        self.version_tag = version_tag.into();
        self
    }

    pub fn with_logo_jpeg(mut self, bytes: Vec<u8>) -> Self {
        self.logo_jpeg = Some(bytes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ReportTheme::default();
        assert_eq!(theme.brand_name, "VeriText");
        assert!(theme.version_tag.starts_with("Version "));
        assert!(theme.logo_jpeg.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let theme = ReportTheme::new("Acme Detect")
            .with_version_tag("Version 9.9")
            .with_logo_jpeg(vec![0xFF, 0xD8]);
        assert_eq!(theme.brand_name, "Acme Detect");
        assert_eq!(theme.version_tag, "Version 9.9");
        assert_eq!(theme.logo_jpeg.as_deref(), Some(&[0xFF, 0xD8][..]));
    }
}
