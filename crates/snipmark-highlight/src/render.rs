//! Markup rendering.
//!
//! Segment text is already escaped, so rendering is pure concatenation:
//! plain segments are emitted as-is and classified segments get a
//! `<span class="...">` wrapper.

use std::fmt::Write;

use crate::escape::escape;
use crate::stats::Stats;
use crate::token::SegmentStream;

/// Token colors used by [`render_page`].
pub const STYLESHEET: &str = "\
.keyword{color:#d73a49;font-weight:bold}
.function{color:#6f42c1}
.string{color:#032f62}
.comment{color:#6a737d;font-style:italic}
.number{color:#005cc5}
.workers-specific{color:#e36209;font-weight:bold}
.bracket{color:#24292e;font-weight:bold}
.operator{color:#d73a49}
";

/// Concatenates the stream into one markup string.
pub fn render(stream: &SegmentStream) -> String {
    let mut markup = String::new();
    for segment in stream {
        match segment.class.css_class() {
            Some(class) => {
                let _ = write!(markup, r#"<span class="{}">{}</span>"#, class, segment.text);
            }
            None => markup.push_str(&segment.text),
        }
    }
    markup
}

/// Wraps rendered markup in a standalone HTML page with the token stylesheet.
pub fn render_page(markup: &str, stats: &Stats, title: &str) -> String {
    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         pre{{font-family:Consolas,Monaco,\"Courier New\",monospace;font-size:14px;white-space:pre-wrap;word-wrap:break-word}}\n\
         {STYLESHEET}\
         </style>\n\
         </head>\n\
         <body>\n\
         <pre id=\"highlightedOutput\">{markup}</pre>\n\
         <footer>{stats}</footer>\n\
         </body>\n\
         </html>\n"
    )
}
