//! Post index built from a Notion database.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::model::{plain_text, PageObject, PropertyValue};
use crate::source::{fetch_posts, PostSource};

/// Title used when a post has no title text.
pub const UNTITLED: &str = "Untitled";

/// Summary of one post in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Page id, usable with [`crate::render_page`]
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date, if set and parsable
    pub date: Option<NaiveDate>,

    /// Tag names in property order
    pub tags: Vec<String>,
}

impl PostSummary {
    /// Check if the post carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Which database properties hold the title, date and tags.
///
/// Unset names fall back to the first property of the matching type.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Title property name
    pub title_property: Option<String>,

    /// Date property name
    pub date_property: Option<String>,

    /// Tags (multi-select) property name
    pub tags_property: Option<String>,
}

impl IndexOptions {
    /// Create new index options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title property name.
    pub fn with_title_property(mut self, name: impl Into<String>) -> Self {
        self.title_property = Some(name.into());
        self
    }

    /// Set the date property name.
    pub fn with_date_property(mut self, name: impl Into<String>) -> Self {
        self.date_property = Some(name.into());
        self
    }

    /// Set the tags property name.
    pub fn with_tags_property(mut self, name: impl Into<String>) -> Self {
        self.tags_property = Some(name.into());
        self
    }
}

/// Query every row of `database_id` and summarize it, in source order.
pub fn render_index<S: PostSource + ?Sized>(
    source: &S,
    database_id: &str,
    options: &IndexOptions,
) -> Result<Vec<PostSummary>> {
    let pages = fetch_posts(source, database_id)?;
    log::debug!("Indexed {} posts from {}", pages.len(), database_id);
    Ok(pages.iter().map(|page| summarize(page, options)).collect())
}

/// Summarize one database row.
pub fn summarize(page: &PageObject, options: &IndexOptions) -> PostSummary {
    let title = match page.find_property(
        options.title_property.as_deref(),
        PropertyValue::is_title,
    ) {
        Some(PropertyValue::Title { title }) => plain_text(title).trim().to_string(),
        _ => String::new(),
    };

    let date = match page.find_property(options.date_property.as_deref(), PropertyValue::is_date) {
        Some(PropertyValue::Date { date: Some(value) }) => parse_date(&value.start),
        _ => None,
    };

    let tags = match page.find_property(
        options.tags_property.as_deref(),
        PropertyValue::is_multi_select,
    ) {
        Some(PropertyValue::MultiSelect { multi_select }) => {
            multi_select.iter().map(|o| o.name.clone()).collect()
        }
        _ => Vec::new(),
    };

    PostSummary {
        id: page.id.clone(),
        title: if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        },
        date,
        tags,
    }
}

/// Count posts per tag, sorted by tag name.
pub fn tag_counts(posts: &[PostSummary]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

/// Parse a date or datetime string to its calendar date.
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            log::warn!("Unrecognized date value '{}'", value);
            None
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> PageObject {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_summarize_by_type() {
        let p = page(
            r#"{"id": "p1", "properties": {
                "Name": {"type": "title", "title": [{"type": "text", "text": {"content": "First"}}]},
                "When": {"type": "date", "date": {"start": "2024-05-02T09:30:00.000+09:00"}},
                "Tags": {"type": "multi_select", "multi_select": [{"name": "rust"}, {"name": "web"}]}
            }}"#,
        );
        let summary = summarize(&p, &IndexOptions::default());
        assert_eq!(summary.title, "First");
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(summary.tags, vec!["rust", "web"]);
        assert!(summary.has_tag("web"));
    }

    #[test]
    fn test_summarize_fallbacks() {
        let p = page(
            r#"{"id": "p2", "properties": {
                "Name": {"type": "title", "title": []},
                "When": {"type": "date", "date": null}
            }}"#,
        );
        let summary = summarize(&p, &IndexOptions::default());
        assert_eq!(summary.title, UNTITLED);
        assert_eq!(summary.date, None);
        assert!(summary.tags.is_empty());
    }

    #[test]
    fn test_summarize_named_properties() {
        let p = page(
            r#"{"id": "p3", "properties": {
                "Created": {"type": "date", "date": {"start": "2020-01-01"}},
                "Published": {"type": "date", "date": {"start": "2023-07-14"}}
            }}"#,
        );
        let options = IndexOptions::new().with_date_property("Published");
        assert_eq!(
            summarize(&p, &options).date,
            NaiveDate::from_ymd_opt(2023, 7, 14)
        );
        assert_eq!(
            summarize(&p, &IndexOptions::default()).date,
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
    }

    #[test]
    fn test_tag_counts() {
        let post = |tags: &[&str]| PostSummary {
            id: "x".into(),
            title: "t".into(),
            date: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        let counts = tag_counts(&[post(&["rust", "web"]), post(&["rust"]), post(&[])]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["rust"], 2);
        assert_eq!(counts["web"], 1);
    }

    #[test]
    fn test_post_summary_json() {
        let summary = PostSummary {
            id: "p".into(),
            title: "T".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 31),
            tags: vec!["a".into()],
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"id":"p","title":"T","date":"2024-01-31","tags":["a"]}"#);
    }
}
