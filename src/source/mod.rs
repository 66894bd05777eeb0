//! Content sources and the paginated block fetcher.
//!
//! A source is anything that can list the children of a block one page at a
//! time. [`NotionClient`] talks to the Notion REST API; tests plug in
//! in-memory sources.
//!
//! # Example
//!
//! ```no_run
//! use unnotion::source::{fetch_children, ClientOptions, NotionClient};
//!
//! fn main() -> unnotion::Result<()> {
//!     let client = NotionClient::new(ClientOptions::from_env()?)?;
//!     let blocks = fetch_children(&client, "0123abcd-4567-89ab-cdef-0123456789ab")?;
//!     println!("{} top-level blocks", blocks.len());
//!     Ok(())
//! }
//! ```

mod client;

pub use client::{ClientOptions, NotionClient, DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION};

use crate::error::{Error, Result};
use crate::model::{Block, ListPage, PageObject};

/// Number of items requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Provider of block children, one page per call.
pub trait BlockSource: Send + Sync {
    /// List one page of the children of `block_id`.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// `next_cursor` afterwards.
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage<Block>>;
}

/// Provider of database rows for the post index, one page per call.
pub trait PostSource: Send + Sync {
    /// Query one page of the rows of `database_id`.
    fn query_posts(
        &self,
        database_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage<PageObject>>;
}

/// Drain a paginated listing into one vector, preserving page order.
///
/// `fetch` is called with `None` first and then with each page's
/// `next_cursor` until a page reports `has_more == false`. A page that
/// claims more results but carries no cursor ends the listing.
pub fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<ListPage<T>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.as_deref())?;
        pages += 1;
        items.extend(page.results);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                log::warn!("Listing reported more pages without a cursor; stopping");
                break;
            }
        }
    }

    log::debug!("Collected {} items from {} pages", items.len(), pages);
    Ok(items)
}

/// Fetch every child of `block_id`, in source order.
///
/// Any failing page aborts the fetch with [`Error::Provider`].
pub fn fetch_children<S: BlockSource + ?Sized>(source: &S, block_id: &str) -> Result<Vec<Block>> {
    log::debug!("Fetching children of {}", block_id);
    collect_pages(|cursor| source.list_children(block_id, cursor, PAGE_SIZE))
        .map_err(|e| Error::provider(block_id, e))
}

/// Fetch every row of a database, in source order.
pub fn fetch_posts<S: PostSource + ?Sized>(
    source: &S,
    database_id: &str,
) -> Result<Vec<PageObject>> {
    log::debug!("Querying database {}", database_id);
    collect_pages(|cursor| source.query_posts(database_id, cursor, PAGE_SIZE))
        .map_err(|e| Error::provider(database_id, e))
}
