//! Markdown conversion and sanitization.
//!
//! Bodies are converted with [pulldown-cmark](https://docs.rs/pulldown-cmark)
//! (tables, footnotes, strikethrough and task lists enabled) and the result is
//! passed through [ammonia](https://docs.rs/ammonia) before anything else
//! touches it. Everything downstream (anchors, link rewriting, templating)
//! can assume well-formed, safe markup.

use ammonia::Builder;
use pulldown_cmark::{Options, Parser, html};
use std::sync::LazyLock;

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(sanitizer);

/// Markdown extensions enabled for every page.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Sanitizer policy: ammonia's defaults plus media elements, ids and classes.
pub fn sanitizer() -> Builder<'static> {
    let mut builder = Builder::default();
    builder.add_tags(&["video", "audio", "source", "track", "input"]);
    builder.add_generic_attributes(&["id", "class"]);
    builder.add_tag_attributes(
        "video",
        &["src", "poster", "controls", "width", "height", "loop", "muted", "playsinline"],
    );
    builder.add_tag_attributes("audio", &["src", "controls", "loop", "muted"]);
    builder.add_tag_attributes("source", &["src", "type", "media"]);
    builder.add_tag_attributes("track", &["src", "kind", "srclang", "label", "default"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder
}

/// Convert markdown to (unsanitized) HTML.
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Strip anything unsafe from an HTML fragment.
pub fn sanitize(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Convert and sanitize in one step.
pub fn render(markdown: &str) -> String {
    sanitize(&to_html(markdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_basic_markdown() {
        let html = render("# Hi\n\nSome **bold** text.");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn tables_are_enabled() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn scripts_are_removed() {
        let html = render("hello <script>alert(1)</script>");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
    }

    #[test]
    fn event_handlers_are_removed() {
        let html = render(r#"<img src="a.png" onerror="alert(1)">"#);
        assert!(html.contains(r#"src="a.png""#));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn media_elements_survive() {
        let html = render(r#"<video controls src="clip.mp4" poster="p.jpg"></video>"#);
        assert!(html.contains("<video"), "{html}");
        assert!(html.contains(r#"poster="p.jpg""#), "{html}");
    }

    #[test]
    fn relative_urls_pass_through() {
        let html = render("![logo](../img/logo.png?v=2#frag)");
        assert!(html.contains(r#"src="../img/logo.png?v=2#frag""#), "{html}");
    }
}
