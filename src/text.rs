//! Light text normalization for exported course files.
//!
//! These helpers only strip markup so that documents carry readable text;
//! they are not full HTML or Markdown renderers.

use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;
use std::sync::OnceLock;

fn script_or_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->")
            .expect("script/style pattern is valid")
    })
}

fn block_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)</?(p|div|br|hr|h[1-6]|li|ul|ol|tr|td|th|table|section|article|header|footer|title|head|body|html|blockquote|pre)\b[^>]*>",
        )
        .expect("block tag pattern is valid")
    })
}

fn tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\r\f]*\n[\s]*").expect("blank-run pattern is valid"))
}

fn spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\r\f]+").expect("space pattern is valid"))
}

/// Strip tags from HTML or XML, keeping one line per block of text
pub fn html_to_text(html: &str) -> String {
    let without_code = script_or_style().replace_all(html, " ");
    let with_breaks = block_tag().replace_all(&without_code, "\n");
    let without_tags = tag().replace_all(&with_breaks, "");
    let decoded = decode_entities(&without_tags);
    let collapsed = spaces().replace_all(&decoded, " ");
    blank_runs()
        .replace_all(&collapsed, "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Render Markdown as plain text
pub fn markdown_to_text(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut text = String::new();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::Item
                | Tag::CodeBlock(_)
                | Tag::TableRow
                | Tag::TableHead,
            ) => text.push('\n'),
            Event::End(Tag::TableCell) => text.push('\t'),
            _ => {}
        }
    }

    text.trim_end().to_string()
}
