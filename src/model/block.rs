//! Block-level types.

use super::RichText;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of a Notion page's block tree.
///
/// Decodes from the Notion block object: the `type` field names the kind and
/// the kind's payload lives under the key of the same name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Stable block id
    pub id: String,

    /// Whether the block has child blocks to fetch
    pub has_children: bool,

    /// Kind and kind-specific payload
    pub kind: BlockKind,
}

impl Block {
    /// Create a block without children.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
        }
    }

    /// Mark the block as having children and return self.
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Create a paragraph block.
    pub fn paragraph(id: impl Into<String>, rich_text: Vec<RichText>) -> Self {
        Self::new(id, BlockKind::Paragraph(TextBlock::new(rich_text)))
    }

    /// Create a bulleted list item.
    pub fn bulleted(id: impl Into<String>, rich_text: Vec<RichText>) -> Self {
        Self::new(id, BlockKind::BulletedListItem(TextBlock::new(rich_text)))
    }

    /// Create a numbered list item.
    pub fn numbered(id: impl Into<String>, rich_text: Vec<RichText>) -> Self {
        Self::new(id, BlockKind::NumberedListItem(TextBlock::new(rich_text)))
    }

    /// Wire name of the block's kind.
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// List kind if this block is a list item.
    pub fn list_kind(&self) -> Option<ListKind> {
        match self.kind {
            BlockKind::BulletedListItem(_) => Some(ListKind::Bulleted),
            BlockKind::NumberedListItem(_) => Some(ListKind::Numbered),
            _ => None,
        }
    }

    /// Check if the renderer descends into this block's children.
    ///
    /// Only container kinds and list items are recursed into; children of
    /// any other kind are never fetched.
    pub fn renders_children(&self) -> bool {
        self.has_children
            && matches!(
                self.kind,
                BlockKind::Toggle(_)
                    | BlockKind::ColumnList
                    | BlockKind::Column
                    | BlockKind::Table(_)
                    | BlockKind::BulletedListItem(_)
                    | BlockKind::NumberedListItem(_)
            )
    }
}

/// Kind of a block together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// Plain paragraph
    Paragraph(TextBlock),
    /// Top-level heading
    Heading1(TextBlock),
    /// Second-level heading
    Heading2(TextBlock),
    /// Third-level heading
    Heading3(TextBlock),
    /// Item of an unordered list
    BulletedListItem(TextBlock),
    /// Item of an ordered list
    NumberedListItem(TextBlock),
    /// Checklist item
    ToDo(ToDoBlock),
    /// Collapsible block
    Toggle(TextBlock),
    /// Block quote
    Quote(TextBlock),
    /// Code listing
    Code(CodeBlock),
    /// Display math
    Equation(EquationBlock),
    /// Horizontal separator
    Divider,
    /// Image from a stored file or external URL
    Image(ImageBlock),
    /// Row of columns
    ColumnList,
    /// Single column
    Column,
    /// Table; rows are its children
    Table(TableBlock),
    /// Table row with one rich-text list per cell
    TableRow(TableRowBlock),
    /// Any other kind, by wire name
    Unsupported(String),
}

impl BlockKind {
    /// Wire name of the kind.
    pub fn name(&self) -> &str {
        match self {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Heading1(_) => "heading_1",
            BlockKind::Heading2(_) => "heading_2",
            BlockKind::Heading3(_) => "heading_3",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::ToDo(_) => "to_do",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::Quote(_) => "quote",
            BlockKind::Code(_) => "code",
            BlockKind::Equation(_) => "equation",
            BlockKind::Divider => "divider",
            BlockKind::Image(_) => "image",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::Table(_) => "table",
            BlockKind::TableRow(_) => "table_row",
            BlockKind::Unsupported(name) => name,
        }
    }

    /// Decode a kind from its wire name and payload.
    ///
    /// Unknown names become [`BlockKind::Unsupported`]; a known name with a
    /// payload of the wrong shape is an error.
    pub fn from_payload(name: &str, payload: Value) -> Result<Self, String> {
        let kind = match name {
            "paragraph" => BlockKind::Paragraph(decode(name, payload)?),
            "heading_1" => BlockKind::Heading1(decode(name, payload)?),
            "heading_2" => BlockKind::Heading2(decode(name, payload)?),
            "heading_3" => BlockKind::Heading3(decode(name, payload)?),
            "bulleted_list_item" => BlockKind::BulletedListItem(decode(name, payload)?),
            "numbered_list_item" => BlockKind::NumberedListItem(decode(name, payload)?),
            "to_do" => BlockKind::ToDo(decode(name, payload)?),
            "toggle" => BlockKind::Toggle(decode(name, payload)?),
            "quote" => BlockKind::Quote(decode(name, payload)?),
            "code" => BlockKind::Code(decode(name, payload)?),
            "equation" => BlockKind::Equation(decode(name, payload)?),
            "divider" => BlockKind::Divider,
            "image" => BlockKind::Image(decode(name, payload)?),
            "column_list" => BlockKind::ColumnList,
            "column" => BlockKind::Column,
            "table" => BlockKind::Table(decode(name, payload)?),
            "table_row" => BlockKind::TableRow(decode(name, payload)?),
            other => BlockKind::Unsupported(other.to_string()),
        };
        Ok(kind)
    }
}

fn decode<T: DeserializeOwned>(name: &str, payload: Value) -> Result<T, String> {
    serde_json::from_value(payload).map_err(|e| format!("invalid {} payload: {}", name, e))
}

/// Ordered or unordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `<ul>`
    Bulleted,
    /// `<ol>`
    Numbered,
}

impl ListKind {
    /// HTML container tag for this list kind.
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Bulleted => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

/// Payload of text-bearing kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Inline runs
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl TextBlock {
    /// Create a text payload.
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self { rich_text }
    }
}

/// Payload of a checklist item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    /// Inline runs
    #[serde(default)]
    pub rich_text: Vec<RichText>,

    /// Whether the box is ticked
    #[serde(default)]
    pub checked: bool,
}

/// Payload of a code block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Source text as rich-text runs
    #[serde(default)]
    pub rich_text: Vec<RichText>,

    /// Language tag (may be empty)
    #[serde(default)]
    pub language: String,
}

/// Payload of a display equation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationBlock {
    /// TeX expression
    #[serde(default)]
    pub expression: String,
}

/// Payload of an image block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Notion-hosted file
    #[serde(default)]
    pub file: Option<FileUrl>,

    /// Externally hosted file
    #[serde(default)]
    pub external: Option<FileUrl>,
}

impl ImageBlock {
    /// Create an image pointing at an external URL.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            external: Some(FileUrl { url: url.into() }),
            ..Default::default()
        }
    }

    /// Source URL, preferring the hosted file; empty if neither is present.
    pub fn url(&self) -> &str {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .unwrap_or("")
    }
}

/// A file reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUrl {
    /// File URL
    #[serde(default)]
    pub url: String,
}

/// Payload of a table block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Number of columns
    #[serde(default)]
    pub table_width: u32,

    /// First row is a header row
    #[serde(default)]
    pub has_column_header: bool,

    /// First cell of each row is a header cell
    #[serde(default)]
    pub has_row_header: bool,
}

/// Payload of a table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    /// One rich-text list per cell, in column order
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

impl TableRowBlock {
    /// Create a row of unstyled cells.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: values
                .into_iter()
                .map(|v| vec![RichText::plain(v)])
                .collect(),
        }
    }
}

/// Wire shape of a block before its payload is resolved.
#[derive(Debug, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = String;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let payload = raw
            .rest
            .remove(&raw.kind)
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Object(Map::new()));
        let kind = BlockKind::from_payload(&raw.kind, payload)?;

        Ok(Block {
            id: raw.id,
            has_children: raw.has_children,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_paragraph() {
        let json = r#"{
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {
                "rich_text": [{"type": "text", "text": {"content": "Hi"}}],
                "color": "default"
            }
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.id, "b1");
        assert!(!block.has_children);
        assert_eq!(block.kind_name(), "paragraph");
        assert_eq!(
            block.kind,
            BlockKind::Paragraph(TextBlock::new(vec![RichText::plain("Hi")]))
        );
    }

    #[test]
    fn test_decode_unknown_kind() {
        let json = r#"{"id": "b2", "type": "callout", "has_children": true, "callout": {}}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.kind, BlockKind::Unsupported("callout".into()));
        assert!(block.has_children);
        assert!(!block.renders_children());
    }

    #[test]
    fn test_decode_payloadless_kinds() {
        let block: Block = serde_json::from_str(r#"{"id":"d","type":"divider","divider":{}}"#)
            .unwrap();
        assert_eq!(block.kind, BlockKind::Divider);

        let block: Block = serde_json::from_str(r#"{"id":"c","type":"column_list"}"#).unwrap();
        assert_eq!(block.kind, BlockKind::ColumnList);
    }

    #[test]
    fn test_decode_malformed_payload_fails() {
        let json = r#"{"id":"b","type":"to_do","to_do":{"checked":"yes"}}"#;
        assert!(serde_json::from_str::<Block>(json).is_err());
    }

    #[test]
    fn test_image_url_fallback() {
        assert_eq!(ImageBlock::default().url(), "");
        assert_eq!(ImageBlock::external("http://x/y.png").url(), "http://x/y.png");

        let both = ImageBlock {
            file: Some(FileUrl {
                url: "hosted".into(),
            }),
            external: Some(FileUrl {
                url: "external".into(),
            }),
        };
        assert_eq!(both.url(), "hosted");
    }

    #[test]
    fn test_decode_captioned_image() {
        let json = r#"{"id": "i", "type": "image", "image": {
            "type": "external",
            "external": {"url": "http://x/y.png"},
            "caption": [{"type": "text", "text": {"content": "A chart"}}]
        }}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(
            block.kind,
            BlockKind::Image(ImageBlock::external("http://x/y.png"))
        );
    }

    #[test]
    fn test_list_kind() {
        assert_eq!(
            Block::bulleted("a", vec![]).list_kind(),
            Some(ListKind::Bulleted)
        );
        assert_eq!(
            Block::numbered("a", vec![]).list_kind(),
            Some(ListKind::Numbered)
        );
        assert_eq!(Block::paragraph("a", vec![]).list_kind(), None);
        assert_eq!(ListKind::Numbered.tag(), "ol");
    }

    #[test]
    fn test_renders_children() {
        let toggle = Block::new("t", BlockKind::Toggle(TextBlock::default())).with_children();
        assert!(toggle.renders_children());

        let para = Block::paragraph("p", vec![]).with_children();
        assert!(!para.renders_children());

        let leaf_toggle = Block::new("t", BlockKind::Toggle(TextBlock::default()));
        assert!(!leaf_toggle.renders_children());
    }
}
