//! HTML-to-text, link extraction and wrapping for comment bodies.

use std::sync::LazyLock;

use regex::Regex;

static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break regex"));
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href="([^"]*)"[^>]*>.*?</a>"#).expect("valid anchor regex")
});
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\s[^>]*href="([^"]*)"[^>]*>"#).expect("valid href regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Strip HTML tags and decode entities for terminal display.
///
/// Paragraphs become blank-line separated blocks, `<br>` a line break.
/// Links are replaced by their target URL, since HN truncates the anchor
/// text. `<i>` renders as `_italic_`, `<code>` as `` `code` ``.
pub fn strip_html(html: &str) -> String {
    let text = html
        .replace("<p>", "\n\n")
        .replace("</p>", "")
        .replace("<i>", "_")
        .replace("</i>", "_")
        .replace("<code>", "`")
        .replace("</code>", "`");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = ANCHOR_RE.replace_all(&text, "${1}");
    let text = TAG_RE.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text);

    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(&line);
    }
    out
}

/// Link targets in document order, entity-decoded, without duplicates.
pub fn extract_links(html: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for caps in HREF_RE.captures_iter(html) {
        let url = html_escape::decode_html_entities(&caps[1]).into_owned();
        if !url.is_empty() && !links.contains(&url) {
            links.push(url);
        }
    }
    links
}

/// Wrap text to `width` columns. Hard line breaks are kept; blank lines
/// survive as empty strings.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}
