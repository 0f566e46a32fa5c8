//! Rich-text document content (HTML produced by the editor).

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_RICH_TEXT: &str = "<p></p>";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RichText {
    html: String,
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex must compile"))
}

impl RichText {
    /// Wrap stored content; an empty string becomes an empty paragraph.
    pub fn from_content(content: &str) -> Self {
        let html = if content.is_empty() {
            DEFAULT_RICH_TEXT
        } else {
            content
        };
        RichText {
            html: html.to_string(),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: &str) {
        self.html = html.to_string();
    }

    /// Text with tags stripped and whitespace collapsed.
    pub fn plain_text(&self) -> String {
        let stripped = tag_re().replace_all(&self.html, " ");
        let decoded = stripped
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&");
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }
}

impl Default for RichText {
    fn default() -> Self {
        RichText::from_content(DEFAULT_RICH_TEXT)
    }
}
