//! Rich-text runs and their inline annotations.

use serde::{Deserialize, Serialize};

/// One inline-formatting-homogeneous fragment of a block's text.
///
/// Wire format is the Notion rich text object, tagged by `type`. Variants
/// other than `text` and `equation` (mentions, for instance) decode to
/// [`RichText::Unsupported`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    /// Plain text with annotations
    Text {
        /// Text content
        text: TextContent,
        /// Inline styling
        #[serde(default)]
        annotations: Annotations,
    },

    /// Inline math expression
    Equation {
        /// Expression payload
        equation: EquationContent,
    },

    /// Any other run variant
    #[serde(other)]
    Unsupported,
}

impl RichText {
    /// Create an unstyled text run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, Annotations::default())
    }

    /// Create a text run with the given annotations.
    pub fn styled(content: impl Into<String>, annotations: Annotations) -> Self {
        RichText::Text {
            text: TextContent {
                content: content.into(),
            },
            annotations,
        }
    }

    /// Create a bold text run.
    pub fn bold(content: impl Into<String>) -> Self {
        Self::styled(
            content,
            Annotations {
                bold: true,
                ..Default::default()
            },
        )
    }

    /// Create an inline equation run.
    pub fn equation(expression: impl Into<String>) -> Self {
        RichText::Equation {
            equation: EquationContent {
                expression: expression.into(),
            },
        }
    }

    /// Unstyled text of the run (the expression for equations).
    pub fn plain_text(&self) -> &str {
        match self {
            RichText::Text { text, .. } => &text.content,
            RichText::Equation { equation } => &equation.expression,
            RichText::Unsupported => "",
        }
    }
}

/// Concatenate the unstyled text of a run list.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(RichText::plain_text).collect()
}

/// Text payload of a text run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Literal text
    #[serde(default)]
    pub content: String,
}

/// Payload of an inline equation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationContent {
    /// TeX expression
    #[serde(default)]
    pub expression: String,
}

/// Independent styling flags of a text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Underlined text
    pub underline: bool,

    /// Monospace (inline code)
    pub code: bool,

    /// Foreground or background color
    pub color: Color,
}

impl Annotations {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.strikethrough
            || self.underline
            || self.code
            || !self.color.is_default()
    }
}

/// Named color of a run.
///
/// On the wire a color is a single string; a `_background` suffix marks a
/// background color and `"default"` means no color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    /// No color
    #[default]
    Default,
    /// Text color
    Foreground(String),
    /// Highlight color
    Background(String),
}

const BACKGROUND_SUFFIX: &str = "_background";

impl Color {
    /// Check if this is the default (uncolored) value.
    pub fn is_default(&self) -> bool {
        matches!(self, Color::Default)
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        if value.is_empty() || value == "default" {
            return Color::Default;
        }
        match value.strip_suffix(BACKGROUND_SUFFIX) {
            Some(name) => Color::Background(name.to_string()),
            None => Color::Foreground(value),
        }
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color::from(value.to_string())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        match color {
            Color::Default => "default".to_string(),
            Color::Foreground(name) => name,
            Color::Background(name) => format!("{}{}", name, BACKGROUND_SUFFIX),
        }
    }
}
