//! Inline formatting of rich-text runs.

use crate::model::{Annotations, Color, RichText};

/// A boolean inline annotation with its HTML tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// `<strong>`
    Bold,
    /// `<em>`
    Italic,
    /// `<u>`
    Underline,
    /// `<s>`
    Strikethrough,
    /// `<code>`
    Code,
}

/// Order in which annotation tags are wrapped, innermost first.
///
/// Color is applied after all of these, as the outermost wrapper.
pub const ANNOTATION_ORDER: [Annotation; 5] = [
    Annotation::Bold,
    Annotation::Italic,
    Annotation::Underline,
    Annotation::Strikethrough,
    Annotation::Code,
];

impl Annotation {
    /// HTML element name.
    pub fn tag(self) -> &'static str {
        match self {
            Annotation::Bold => "strong",
            Annotation::Italic => "em",
            Annotation::Underline => "u",
            Annotation::Strikethrough => "s",
            Annotation::Code => "code",
        }
    }

    /// Check if the annotation is set.
    pub fn is_set(self, annotations: &Annotations) -> bool {
        match self {
            Annotation::Bold => annotations.bold,
            Annotation::Italic => annotations.italic,
            Annotation::Underline => annotations.underline,
            Annotation::Strikethrough => annotations.strikethrough,
            Annotation::Code => annotations.code,
        }
    }
}

/// Format a run list as inline HTML.
///
/// Runs are concatenated without separator. Text is emitted verbatim.
pub fn format_runs(runs: &[RichText]) -> String {
    let mut output = String::new();
    for run in runs {
        format_run(&mut output, run);
    }
    output
}

fn format_run(output: &mut String, run: &RichText) {
    match run {
        RichText::Equation { equation } => {
            output.push_str("\\(");
            output.push_str(&equation.expression);
            output.push_str("\\)");
        }
        RichText::Text { text, annotations } => {
            output.push_str(&apply_annotations(&text.content, annotations));
        }
        // Mentions and other run kinds produce nothing
        RichText::Unsupported => {}
    }
}

fn apply_annotations(text: &str, annotations: &Annotations) -> String {
    if !annotations.has_styling() {
        return text.to_string();
    }

    let mut result = text.to_string();
    for annotation in ANNOTATION_ORDER {
        if annotation.is_set(annotations) {
            let tag = annotation.tag();
            result = format!("<{}>{}</{}>", tag, result, tag);
        }
    }

    match &annotations.color {
        Color::Default => result,
        Color::Background(name) => {
            format!("<span style=\"background-color:{};\">{}</span>", name, result)
        }
        Color::Foreground(name) => format!("<span style=\"color:{};\">{}</span>", name, result),
    }
}
