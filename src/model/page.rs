//! Page objects returned by database queries, and paginated list envelopes.

use super::RichText;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    /// Items in this page, in source order
    pub results: Vec<T>,

    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

impl<T> ListPage<T> {
    /// Create a final page.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    /// Create a page followed by another one at `cursor`.
    pub fn more(results: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            results,
            next_cursor: Some(cursor.into()),
            has_more: true,
        }
    }
}

/// A database row (a Notion page) with its properties.
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    /// Page id
    pub id: String,

    /// Properties by name
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl PageObject {
    /// Look up a property by name, or else the first one matching `pred`.
    ///
    /// Properties are visited in name order so the fallback is stable.
    pub fn find_property<F>(&self, name: Option<&str>, pred: F) -> Option<&PropertyValue>
    where
        F: Fn(&PropertyValue) -> bool,
    {
        if let Some(name) = name {
            return self.properties.get(name);
        }
        let mut names: Vec<&String> = self.properties.keys().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|n| self.properties.get(n))
            .find(|p| pred(p))
    }
}

/// A property value, tagged by `type`.
///
/// Only the property types the post index reads are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// The page title
    Title {
        /// Title runs
        #[serde(default)]
        title: Vec<RichText>,
    },

    /// A date or date range
    Date {
        /// Date value, absent when empty
        #[serde(default)]
        date: Option<DateValue>,
    },

    /// Multiple tags
    MultiSelect {
        /// Selected options
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },

    /// Any other property type
    #[serde(other)]
    Other,
}

impl PropertyValue {
    /// Check if this is a title property.
    pub fn is_title(&self) -> bool {
        matches!(self, PropertyValue::Title { .. })
    }

    /// Check if this is a date property.
    pub fn is_date(&self) -> bool {
        matches!(self, PropertyValue::Date { .. })
    }

    /// Check if this is a multi-select property.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, PropertyValue::MultiSelect { .. })
    }
}

/// Date property payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    /// ISO 8601 start date or datetime
    pub start: String,

    /// Optional end of a range
    #[serde(default)]
    pub end: Option<String>,
}

/// One option of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option label
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_JSON: &str = r#"{
        "object": "page",
        "id": "p1",
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [
                {"type": "text", "text": {"content": "Hello"}, "plain_text": "Hello"}
            ]},
            "Published": {"id": "a", "type": "date", "date": {"start": "2024-03-01", "end": null}},
            "Tags": {"id": "b", "type": "multi_select", "multi_select": [
                {"id": "x", "name": "rust", "color": "red"}
            ]},
            "Views": {"id": "c", "type": "number", "number": 3}
        }
    }"#;

    #[test]
    fn test_decode_page_object() {
        let page: PageObject = serde_json::from_str(PAGE_JSON).unwrap();
        assert_eq!(page.id, "p1");
        assert_eq!(page.properties.len(), 4);
        assert_eq!(page.properties["Views"], PropertyValue::Other);
    }

    #[test]
    fn test_find_property_by_type() {
        let page: PageObject = serde_json::from_str(PAGE_JSON).unwrap();
        let title = page.find_property(None, PropertyValue::is_title);
        assert!(matches!(title, Some(PropertyValue::Title { .. })));

        let date = page.find_property(Some("Published"), PropertyValue::is_date);
        assert!(matches!(date, Some(PropertyValue::Date { date: Some(_) })));

        assert!(page
            .find_property(Some("Missing"), PropertyValue::is_date)
            .is_none());
    }

    #[test]
    fn test_decode_list_page() {
        let json = r#"{"object":"list","results":[1,2,3],"next_cursor":"c2","has_more":true}"#;
        let page: ListPage<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results, vec![1, 2, 3]);
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));
        assert!(page.has_more);
    }
}
