//! Content model for Notion block trees.
//!
//! These types mirror the subset of the Notion API objects the renderer
//! understands. They decode straight from API responses with serde and are
//! never mutated after decoding.

mod block;
mod id;
mod page;
mod rich_text;

pub use block::{
    Block, BlockKind, CodeBlock, EquationBlock, FileUrl, ImageBlock, ListKind, TableBlock,
    TableRowBlock, TextBlock, ToDoBlock,
};
pub use id::normalize_id;
pub use page::{DateValue, ListPage, PageObject, PropertyValue, SelectOption};
pub use rich_text::{plain_text, Annotations, Color, EquationContent, RichText, TextContent};
