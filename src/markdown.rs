//! Markdown rendering boundary
//!
//! Descriptions, modifier descriptions and snippets are rendered to HTML
//! through a [`MarkdownRenderer`]. Any `Fn(&str) -> String` works as one;
//! [`CommonMarkRenderer`] is the stock implementation.

use pulldown_cmark::{html, Options, Parser};

pub trait MarkdownRenderer {
    fn to_html(&self, text: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn to_html(&self, text: &str) -> String {
        self(text)
    }
}

/// CommonMark via pulldown-cmark, with tables and strikethrough
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn to_html(&self, text: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let parser = Parser::new_ext(text, options);
        let mut output = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
