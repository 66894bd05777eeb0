//! Rendering of block trees to HTML.

mod html;
pub mod inline;
mod options;

pub use html::{to_html, HtmlRenderer};
pub use inline::{format_runs, Annotation, ANNOTATION_ORDER};
pub use options::{RenderOptions, DEFAULT_MAX_DEPTH};
