//! HTML rendering for Notion block trees.

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{Block, BlockKind, ImageBlock, ListKind, TableBlock, TableRowBlock};
use crate::source::{fetch_children, BlockSource};

use super::inline::format_runs;
use super::RenderOptions;

/// Render a block sequence to HTML, fetching descendants from `source`.
pub fn to_html<S>(source: &S, blocks: &[Block], options: &RenderOptions) -> Result<String>
where
    S: BlockSource + ?Sized,
{
    HtmlRenderer::new(source, options.clone()).render(blocks)
}

/// HTML renderer.
///
/// Walks a block sequence once, left to right. Runs of same-kind list items
/// are grouped into one list container; container kinds recurse through the
/// block source.
pub struct HtmlRenderer<'a, S: BlockSource + ?Sized> {
    source: &'a S,
    options: RenderOptions,
}

/// A unit of output: one block or a run of same-kind list items.
#[derive(Debug)]
enum Segment<'b> {
    List { kind: ListKind, items: &'b [Block] },
    Single(&'b Block),
}

impl<'a, S: BlockSource + ?Sized> HtmlRenderer<'a, S> {
    /// Create a new HTML renderer.
    pub fn new(source: &'a S, options: RenderOptions) -> Self {
        Self { source, options }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a sequence of top-level blocks.
    pub fn render(&self, blocks: &[Block]) -> Result<String> {
        self.render_blocks(blocks, 0)
    }

    /// Fetch every child of `container_id` and render them.
    pub fn render_container(&self, container_id: &str) -> Result<String> {
        self.render_children(container_id, 0)
    }

    fn render_children(&self, container_id: &str, depth: usize) -> Result<String> {
        let blocks = fetch_children(self.source, container_id)?;
        self.render_blocks(&blocks, depth)
    }

    fn render_blocks(&self, blocks: &[Block], depth: usize) -> Result<String> {
        let segments = group_segments(blocks);

        if self.options.parallel && segments.len() > 1 {
            let parts = segments
                .par_iter()
                .map(|segment| -> Result<String> {
                    let mut part = String::new();
                    self.render_segment(&mut part, segment, depth)?;
                    Ok(part)
                })
                .collect::<Result<Vec<String>>>()?;
            return Ok(parts.concat());
        }

        let mut output = String::new();
        for segment in &segments {
            self.render_segment(&mut output, segment, depth)?;
        }
        Ok(output)
    }

    fn render_segment(
        &self,
        output: &mut String,
        segment: &Segment<'_>,
        depth: usize,
    ) -> Result<()> {
        match segment {
            Segment::List { kind, items } => self.render_list(output, *kind, items, depth),
            Segment::Single(block) => self.render_block(output, block, depth),
        }
    }

    fn render_block(&self, output: &mut String, block: &Block, depth: usize) -> Result<()> {
        match &block.kind {
            BlockKind::Paragraph(p) => wrap(output, "p", &format_runs(&p.rich_text)),
            BlockKind::Heading1(h) => wrap(output, "h1", &format_runs(&h.rich_text)),
            BlockKind::Heading2(h) => wrap(output, "h2", &format_runs(&h.rich_text)),
            BlockKind::Heading3(h) => wrap(output, "h3", &format_runs(&h.rich_text)),
            BlockKind::Quote(q) => wrap(output, "blockquote", &format_runs(&q.rich_text)),
            BlockKind::BulletedListItem(_) | BlockKind::NumberedListItem(_) => {
                // Only reachable through grouping; a lone item is a list of one
                if let Some(kind) = block.list_kind() {
                    self.render_list(output, kind, std::slice::from_ref(block), depth)?;
                }
            }
            BlockKind::ToDo(todo) => {
                output.push_str("<div class=\"todo-item\"><input type=\"checkbox\"");
                if todo.checked {
                    output.push_str(" checked");
                }
                output.push_str("/><span>");
                output.push_str(&format_runs(&todo.rich_text));
                output.push_str("</span></div>");
            }
            BlockKind::Toggle(toggle) => {
                let body = self.render_nested(block, depth)?;
                output.push_str("<details class=\"toggle-block\"><summary>");
                output.push_str(&format_runs(&toggle.rich_text));
                output.push_str("</summary>");
                output.push_str(&body);
                output.push_str("</details>");
            }
            BlockKind::Code(code) => {
                let language = if code.language.is_empty() {
                    self.options.default_code_language.as_str()
                } else {
                    code.language.as_str()
                };
                output.push_str(&format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>",
                    language,
                    format_runs(&code.rich_text)
                ));
            }
            BlockKind::Equation(eq) => {
                output.push_str(&format!("<p class=\"math-block\">\\[{}\\]</p>", eq.expression));
            }
            BlockKind::Divider => output.push_str("<hr/>"),
            BlockKind::Image(image) => self.render_image(output, image),
            BlockKind::ColumnList => {
                let body = self.render_nested(block, depth)?;
                output.push_str(&format!("<div class=\"column-list\">{}</div>", body));
            }
            BlockKind::Column => {
                let body = self.render_nested(block, depth)?;
                output.push_str(&format!("<div class=\"column\">{}</div>", body));
            }
            BlockKind::Table(table) => self.render_table(output, block, table, depth)?,
            BlockKind::TableRow(_) => {
                log::warn!("Table row {} outside of a table; skipped", block.id);
            }
            BlockKind::Unsupported(kind) => {
                log::warn!("Unsupported block kind '{}' ({})", kind, block.id);
                output.push_str(&format!(
                    "<div class=\"unsupported\">[{}] block is not supported yet.</div>",
                    kind
                ));
            }
        }
        Ok(())
    }

    fn render_list(
        &self,
        output: &mut String,
        kind: ListKind,
        items: &[Block],
        depth: usize,
    ) -> Result<()> {
        let tag = kind.tag();
        output.push_str(&format!("<{}>", tag));

        for item in items {
            let runs = match &item.kind {
                BlockKind::BulletedListItem(t) | BlockKind::NumberedListItem(t) => &t.rich_text,
                _ => continue,
            };

            output.push_str("<li>");
            output.push_str(&format_runs(runs));

            let nested = self.render_nested(item, depth)?;
            if !nested.is_empty() {
                output.push_str(&format!("<{}>{}</{}>", tag, nested, tag));
            }
            output.push_str("</li>");
        }

        output.push_str(&format!("</{}>", tag));
        Ok(())
    }

    fn render_table(
        &self,
        output: &mut String,
        block: &Block,
        table: &TableBlock,
        depth: usize,
    ) -> Result<()> {
        output.push_str("<table class=\"notion-table\">");

        if block.renders_children() {
            match self.enter(block, depth) {
                Some(_) => {
                    let children = fetch_children(self.source, &block.id)?;
                    let mut row_index = 0;
                    for child in &children {
                        match &child.kind {
                            BlockKind::TableRow(row) => {
                                render_row(output, table, row, row_index);
                                row_index += 1;
                            }
                            other => {
                                log::warn!(
                                    "Skipping non-row child '{}' of table {}",
                                    other.name(),
                                    block.id
                                );
                            }
                        }
                    }
                }
                None => output.push_str(&depth_marker(block)),
            }
        }

        output.push_str("</table>");
        Ok(())
    }

    fn render_image(&self, output: &mut String, image: &ImageBlock) {
        output.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" class=\"notion-image\"/>",
            image.url(),
            self.options.image_alt
        ));
    }

    /// Render the children of a container block, or nothing for leaves.
    fn render_nested(&self, block: &Block, depth: usize) -> Result<String> {
        if !block.renders_children() {
            return Ok(String::new());
        }
        match self.enter(block, depth) {
            Some(child_depth) => self.render_children(&block.id, child_depth),
            None => Ok(depth_marker(block)),
        }
    }

    /// Depth of `block`'s children, or `None` past the nesting limit.
    fn enter(&self, block: &Block, depth: usize) -> Option<usize> {
        let child_depth = depth + 1;
        if child_depth > self.options.max_depth {
            log::warn!(
                "Nesting limit {} reached at {} ({}); children not rendered",
                self.options.max_depth,
                block.id,
                block.kind_name()
            );
            return None;
        }
        log::debug!("Descending into {} {} at depth {}", block.kind_name(), block.id, child_depth);
        Some(child_depth)
    }
}

fn group_segments(blocks: &[Block]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut i = 0;

    while i < blocks.len() {
        match blocks[i].list_kind() {
            Some(kind) => {
                let run = blocks[i..]
                    .iter()
                    .take_while(|b| b.list_kind() == Some(kind))
                    .count();
                segments.push(Segment::List {
                    kind,
                    items: &blocks[i..i + run],
                });
                i += run;
            }
            None => {
                segments.push(Segment::Single(&blocks[i]));
                i += 1;
            }
        }
    }

    segments
}

fn render_row(output: &mut String, table: &TableBlock, row: &TableRowBlock, row_index: usize) {
    output.push_str("<tr>");
    for (cell_index, cell) in row.cells.iter().enumerate() {
        let is_header = (table.has_column_header && row_index == 0)
            || (table.has_row_header && cell_index == 0);
        let tag = if is_header { "th" } else { "td" };
        wrap(output, tag, &format_runs(cell));
    }
    output.push_str("</tr>");
}

fn wrap(output: &mut String, tag: &str, content: &str) {
    output.push_str(&format!("<{}>{}</{}>", tag, content, tag));
}

fn depth_marker(block: &Block) -> String {
    format!(
        "<div class=\"depth-limit\">[{}] content is nested too deeply to render.</div>",
        block.kind_name()
    )
}
