use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::templates;

static LIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)(<ul>.*)$").expect("list split pattern is valid"));

static NOTE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"> \[!NOTE\]\s*>\s*(.*)").expect("note block pattern is valid")
});

#[derive(Debug, Default, Serialize)]
struct Page<'a> {
    title: String,
    note: Option<&'a str>,
    list: Option<&'a str>,
    blocks: Vec<TextBlock<'a>>,
}

/// A markdown heading or paragraph.
#[derive(Debug, Serialize)]
struct TextBlock<'a> {
    heading: Option<usize>,
    lines: Vec<&'a str>,
}

#[must_use]
pub fn page_title(sdk_name: &str) -> String {
    let short = sdk_name.strip_prefix("azure-sdk-for-").unwrap_or(sdk_name);
    format!("spec-gen-sdk-{short} result")
}

/// Builds a standalone HTML page from a rendered comment body.
///
/// The part of the body before its first list may hold a note, which is
/// turned into an alert box; the list itself is already markup. A body with
/// no list is treated as plain markdown text.
///
/// # Errors
///
/// Returns an error if the bundled page template fails to render.
pub fn render_html(message: &str, sdk_name: &str) -> Result<String> {
    let mut page = Page {
        title: page_title(sdk_name),
        ..Page::default()
    };
    if let Some(captures) = LIST_SPLIT.captures(message) {
        let head = captures.get(1).map_or("", |m| m.as_str().trim());
        page.note = NOTE_BLOCK
            .captures(head)
            .and_then(|note| note.get(1))
            .map(|note| note.as_str().trim())
            .filter(|note| !note.is_empty());
        page.list = captures.get(2).map(|m| m.as_str().trim());
    } else {
        page.blocks = text_blocks(message);
    }
    templates::render(templates::PAGE, &page)
}

/// Headings and paragraphs only; everything else is plain text.
fn text_blocks(markdown: &str) -> Vec<TextBlock<'_>> {
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let level = block.chars().take_while(|c| *c == '#').count();
            match block[level..].strip_prefix(' ') {
                Some(text) if (1..=6).contains(&level) && !text.contains('\n') => TextBlock {
                    heading: Some(level),
                    lines: vec![text.trim()],
                },
                _ => TextBlock {
                    heading: None,
                    lines: block.lines().collect(),
                },
            }
        })
        .collect()
}
