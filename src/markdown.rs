//! Markdown rendering for blog content
//!
//! Blog bodies are written in Markdown in the admin and rendered on the
//! public detail page. Raw HTML in the source is shown as text, never
//! passed through.

use pulldown_cmark::{html, Event, Options, Parser, TagEnd};

/// Render Markdown to HTML
pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Plain-text summary of Markdown, for cards and meta descriptions
pub fn summary(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    crate::resource::excerpt(&text, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = render("# Our Day\n\nA **perfect** garden wedding.");
        assert!(html.contains("<h1>Our Day</h1>"));
        assert!(html.contains("<strong>perfect</strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("Hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_block_html_is_escaped() {
        let html = render("<div onclick=\"x()\">hi</div>\n");
        assert!(!html.contains("<div"));
    }

    #[test]
    fn test_summary_strips_markup() {
        assert_eq!(summary("## Tips\n\nBook **early**.", 100), "Tips Book early.");
    }
}
