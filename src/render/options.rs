//! Rendering options and configuration.

/// Default nesting bound for container descent.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options for rendering a block tree to HTML.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum container nesting depth; deeper children are replaced by a marker
    pub max_depth: usize,

    /// Render independent sibling segments in parallel
    pub parallel: bool,

    /// `alt` text for images
    pub image_alt: String,

    /// Language class for code blocks without a language
    pub default_code_language: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth (at least 1).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Enable or disable parallel rendering of sibling segments.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the image `alt` text.
    pub fn with_image_alt(mut self, alt: impl Into<String>) -> Self {
        self.image_alt = alt.into();
        self
    }

    /// Set the fallback code language.
    pub fn with_default_code_language(mut self, language: impl Into<String>) -> Self {
        self.default_code_language = language.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: false,
            image_alt: "Notion Image".to_string(),
            default_code_language: "plain".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::new();
        assert_eq!(options.max_depth, 32);
        assert!(!options.parallel);
        assert_eq!(options.image_alt, "Notion Image");
        assert_eq!(options.default_code_language, "plain");
    }

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_max_depth(0)
            .with_parallel(true)
            .with_image_alt("figure")
            .with_default_code_language("text");

        assert_eq!(options.max_depth, 1);
        assert!(options.parallel);
        assert_eq!(options.image_alt, "figure");
        assert_eq!(options.default_code_language, "text");
    }
}
