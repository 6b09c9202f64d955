//! HTML-to-text conversion used by the DOCX path.

use regex::Regex;
use std::sync::LazyLock;

static BR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("invalid br regex"));

static BLOCK_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div|li|tr|h[1-6]|blockquote|section|article|header|footer|ul|ol|table|thead|tbody|tfoot)>")
        .expect("invalid block close regex")
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid newline regex"));

/// Flattens HTML to plain text: `<br>` and closing block tags become
/// newlines, remaining tags are stripped, the common entity references are
/// decoded, and runs of 3+ newlines collapse to 2.
pub fn html_to_text(html: &str) -> String {
    let text = BR.replace_all(html, "\n");
    let text = BLOCK_CLOSE.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    EXCESS_NEWLINES.replace_all(&text, "\n\n").trim().to_string()
}
