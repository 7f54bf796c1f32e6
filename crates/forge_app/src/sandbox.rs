//! Standalone host page for a generated prototype.
//!
//! Generated markup runs inside an iframe that may execute scripts but gets
//! no other privileges: no same-origin access, no top-level navigation, no
//! forms or popups.

use forge_api::PrototypeResult;

/// `sandbox` attribute value for the prototype frame.
pub const SANDBOX_POLICY: &str = "allow-scripts";

/// Render a complete HTML page presenting `result`.
pub fn render_host_page(title: &str, result: &PrototypeResult) -> String {
    let body = match result {
        PrototypeResult::Html(markup) => format!(
            "<iframe title=\"{title}\" sandbox=\"{policy}\" srcdoc=\"{doc}\"></iframe>",
            title = escape_html(title),
            policy = SANDBOX_POLICY,
            doc = escape_html(&frame_document(markup)),
        ),
        PrototypeResult::Text(explanation) => format!(
            "<section class=\"unfeasible\"><h2>Prototype not generated</h2><p>{}</p></section>",
            escape_html(explanation)
        ),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>html, body {{ margin: 0; height: 100%; background: #1a1a2e; color: #eee; font-family: sans-serif; }} \
         iframe {{ border: 0; width: 100%; height: 100%; display: block; }} \
         .unfeasible {{ max-width: 40rem; margin: 4rem auto; }}</style>\n\
         </head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n",
        title = escape_html(title),
        body = body,
    )
}

// Markup from the model is body content only
fn frame_document(markup: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
        markup
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_html_prototype_is_sandboxed() {
        let result = PrototypeResult::Html("<script>if (a < b && c) alert(\"hi\");</script>".into());
        let page = render_host_page("Level 1", &result);

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("sandbox=\"allow-scripts\""));
        assert!(!page.contains("allow-same-origin"));
        // Script is only present escaped inside srcdoc
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;if (a &lt; b &amp;&amp; c) alert(&quot;hi&quot;);"));
    }

    #[test]
    fn test_text_result_is_shown_escaped() {
        let result = PrototypeResult::Text("goal <unreachable>".into());
        let page = render_host_page("Level 2", &result);

        assert!(!page.contains("<iframe"));
        assert!(page.contains("<p>goal &lt;unreachable&gt;</p>"));
        assert!(page.contains("<title>Level 2</title>"));
    }
}
