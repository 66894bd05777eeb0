//! # unnotion
//!
//! Render Notion pages to HTML.
//!
//! This library walks a Notion block tree, fetching children page by page,
//! and turns it into a single HTML string. Adjacent list items are grouped
//! into one list, containers are rendered recursively, and inline
//! annotations are applied in a fixed nesting order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unnotion::{render_page, ClientOptions, NotionClient, RenderOptions};
//!
//! fn main() -> unnotion::Result<()> {
//!     let client = NotionClient::new(ClientOptions::from_env()?)?;
//!     let html = render_page(
//!         &client,
//!         "https://www.notion.so/My-Post-0123abcd456789abcdef0123456789ab",
//!         &RenderOptions::default(),
//!     )?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Complete fetching**: children are paginated until exhausted
//! - **Structure preservation**: lists, toggles, columns, tables, to-dos
//! - **Graceful degradation**: unknown block kinds become placeholders
//! - **Parallel rendering**: optional, via Rayon, with identical output
//! - **Post index**: titles, dates and tags from a Notion database

pub mod error;
pub mod index;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use index::{render_index, tag_counts, IndexOptions, PostSummary};
pub use model::{normalize_id, Annotations, Block, BlockKind, Color, RichText};
pub use render::{format_runs, to_html, HtmlRenderer, RenderOptions, ANNOTATION_ORDER};
pub use source::{
    fetch_children, BlockSource, ClientOptions, NotionClient, PostSource, PAGE_SIZE,
};

/// Render every block of a page to HTML.
///
/// `page` may be a page id in either form or a Notion page URL. A failed
/// fetch anywhere in the tree aborts the render with [`Error::Provider`].
///
/// # Example
///
/// ```no_run
/// use unnotion::{render_page, ClientOptions, NotionClient, RenderOptions};
///
/// let client = NotionClient::new(ClientOptions::new("secret_xxx")).unwrap();
/// let options = RenderOptions::new().with_parallel(true);
/// let html = render_page(&client, "0123abcd456789abcdef0123456789ab", &options).unwrap();
/// ```
pub fn render_page<S: BlockSource + ?Sized>(
    source: &S,
    page: &str,
    options: &RenderOptions,
) -> Result<String> {
    let page_id = normalize_id(page)?;
    log::debug!("Rendering page {}", page_id);
    HtmlRenderer::new(source, options.clone()).render_container(&page_id)
}
