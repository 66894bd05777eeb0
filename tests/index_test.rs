//! Integration tests for the post index.

use std::sync::Mutex;

use chrono::NaiveDate;
use unnotion::error::{Error, Result};
use unnotion::model::{ListPage, PageObject};
use unnotion::{render_index, tag_counts, IndexOptions, PostSource};

/// Serves database rows two per page.
struct MockDatabase {
    rows: Vec<PageObject>,
    fail: bool,
    cursors: Mutex<Vec<Option<String>>>,
}

impl MockDatabase {
    fn new(rows: Vec<PageObject>) -> Self {
        Self {
            rows,
            fail: false,
            cursors: Mutex::new(Vec::new()),
        }
    }
}

impl PostSource for MockDatabase {
    fn query_posts(
        &self,
        _database_id: &str,
        cursor: Option<&str>,
        _page_size: u32,
    ) -> Result<ListPage<PageObject>> {
        self.cursors
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));
        if self.fail {
            return Err(Error::Api {
                status: 401,
                code: "unauthorized".into(),
                message: "API token is invalid.".into(),
            });
        }

        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + 2).min(self.rows.len());
        let results = self.rows[start..end].to_vec();
        if end < self.rows.len() {
            Ok(ListPage::more(results, end.to_string()))
        } else {
            Ok(ListPage::last(results))
        }
    }
}

fn row(id: &str, title: &str, date: Option<&str>, tags: &[&str]) -> PageObject {
    let date = match date {
        Some(d) => serde_json::json!({ "start": d }),
        None => serde_json::Value::Null,
    };
    let tags: Vec<_> = tags
        .iter()
        .map(|t| serde_json::json!({ "id": t, "name": t, "color": "default" }))
        .collect();
    let value = serde_json::json!({
        "object": "page",
        "id": id,
        "properties": {
            "Name": { "type": "title", "title": [
                { "type": "text", "text": { "content": title }, "plain_text": title }
            ]},
            "Date": { "type": "date", "date": date },
            "Tags": { "type": "multi_select", "multi_select": tags },
            "Draft": { "type": "checkbox", "checkbox": false }
        }
    });
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_render_index_all_pages() {
    let db = MockDatabase::new(vec![
        row("p1", "First", Some("2024-01-10"), &["rust"]),
        row("p2", "Second", None, &["rust", "notion"]),
        row("p3", "", Some("2024-02-01"), &[]),
    ]);

    let posts = render_index(&db, "db", &IndexOptions::default()).unwrap();

    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].id, "p1");
    assert_eq!(posts[0].date, NaiveDate::from_ymd_opt(2024, 1, 10));
    assert_eq!(posts[1].date, None);
    assert_eq!(posts[1].tags, vec!["rust", "notion"]);
    assert_eq!(posts[2].title, "Untitled");
    assert_eq!(
        *db.cursors.lock().unwrap(),
        vec![None, Some("2".to_string())]
    );

    let counts = tag_counts(&posts);
    assert_eq!(counts.get("rust"), Some(&2));
    assert_eq!(counts.get("notion"), Some(&1));
}

#[test]
fn test_render_index_named_property_missing() {
    let db = MockDatabase::new(vec![row("p1", "First", Some("2024-01-10"), &["a"])]);
    let options = IndexOptions::new().with_tags_property("Categories");

    let posts = render_index(&db, "db", &options).unwrap();
    assert!(posts[0].tags.is_empty());
    assert_eq!(posts[0].title, "First");
}

#[test]
fn test_render_index_failure() {
    let mut db = MockDatabase::new(Vec::new());
    db.fail = true;

    let err = render_index(&db, "db", &IndexOptions::default()).unwrap_err();
    assert!(err.is_provider());
    assert!(err.to_string().contains("unauthorized"));
}
