use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use ammonia::{Builder, UrlRelative};
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid html tag pattern"));
static HEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s*").expect("valid heading pattern"));
static INLINE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link pattern"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_`]").expect("valid emphasis pattern"));

/// Converts Markdown content to sanitized HTML to prevent XSS attacks.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let options = Options::all();
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

/// Removes unsafe HTML, forcing `rel` on links and dropping relative URLs.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

/// Reduces markdown to plain text: HTML tags, heading markers, link syntax
/// (the link text is kept) and emphasis markers are removed.
pub fn strip_markdown(content: &str) -> String {
    let without_tags = HTML_TAG.replace_all(content, "");
    let without_headings = HEADING_MARKER.replace_all(&without_tags, "");
    let without_links = INLINE_LINK.replace_all(&without_headings, "$1");
    let without_emphasis = EMPHASIS.replace_all(&without_links, "");

    without_emphasis.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_markdown_keeps_link_text() {
        let plain = strip_markdown("# Title\n\nSee [the docs](https://docs.rs) for **more**.");
        assert_eq!(plain, "Title\n\nSee the docs for more.");
    }

    #[test]
    fn strip_markdown_drops_html_and_code_ticks() {
        let plain = strip_markdown("<div class=\"x\">Hi</div> `code` _it_");
        assert_eq!(plain, "Hi code it");
    }

    #[test]
    fn strip_markdown_only_removes_leading_hashes() {
        assert_eq!(strip_markdown("## C# tips"), "C# tips");
    }

    #[test]
    fn html_output_is_sanitized() {
        let html = safe_markdown_to_html("hello <script>alert(1)</script>");
        assert!(html.contains("hello"));
        assert!(!html.contains("<script>"));
    }
}
