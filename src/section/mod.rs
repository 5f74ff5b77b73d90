//! Style guide sections
//!
//! A [`Section`] is the documentation parsed out of one comment block: its
//! title, description, modifiers, example and markup snippets, and the
//! `Styleguide` reference that addresses it.

pub mod arguments;
pub mod block_parser;
pub mod merge;
pub mod reference;

pub use arguments::{
    derive_attributes, ArgumentMap, ArgumentParser, ArgumentValue, KeyValueArgumentParser,
};
pub use block_parser::{classify_line, BlockParser, LineRule, ParserState, LINE_RULES};
pub use merge::MergeEngine;
pub use reference::{segment_sort_key, ParsedReference, ReferenceResolver};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::comment::RawCommentBlock;
use crate::error::{KssError, Result};
use crate::markdown::MarkdownRenderer;

/// How a block relates to the section sharing its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeType {
    /// `Styleguide`: defines the section
    #[default]
    Plain,
    /// `StyleguideExtendBefore`: prepends to the section
    ExtendBefore,
    /// `StyleguideExtendAfter`: appends to the section
    ExtendAfter,
    /// `StyleguideReplace`: replaces the section's content
    Replace,
}

impl MergeType {
    /// Every kind that folds into an existing section, with its keyword suffix
    pub const MERGE_KINDS: [MergeType; 3] = [
        MergeType::ExtendBefore,
        MergeType::ExtendAfter,
        MergeType::Replace,
    ];

    /// Text appended to the `Styleguide` keyword for this kind
    pub fn keyword_suffix(&self) -> &'static str {
        match self {
            MergeType::Plain => "",
            MergeType::ExtendBefore => "ExtendBefore",
            MergeType::ExtendAfter => "ExtendAfter",
            MergeType::Replace => "Replace",
        }
    }

    pub fn is_merge(&self) -> bool {
        !matches!(self, MergeType::Plain)
    }

    pub fn is_extend(&self) -> bool {
        matches!(self, MergeType::ExtendBefore | MergeType::ExtendAfter)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeType::Plain => "plain",
            MergeType::ExtendBefore => "extend_before",
            MergeType::ExtendAfter => "extend_after",
            MergeType::Replace => "replace",
        }
    }
}

impl fmt::Display for MergeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An example or markup snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Dedented snippet text
    pub text: String,
    /// Text following `Markup:`/`Example:` on the keyword line
    pub argument_string: Option<String>,
    /// Attributes derived from the argument string (always has title, syntax, type)
    pub attributes: ArgumentMap,
    /// Base name of the file the snippet was written in
    pub source_filename: String,
    /// Text with `$modifier_class` still in place, used to build modifier variants
    #[serde(skip)]
    pub(crate) variant_seed: String,
}

pub type ExampleBlock = Snippet;
pub type MarkupBlock = Snippet;

impl Snippet {
    pub fn title(&self) -> &str {
        self.attribute_str("title").unwrap_or("")
    }

    pub fn syntax(&self) -> &str {
        self.attribute_str("syntax").unwrap_or(arguments::DEFAULT_SYNTAX)
    }

    pub fn snippet_type(&self) -> &str {
        self.attribute_str("type").unwrap_or(arguments::DEFAULT_TYPE)
    }

    pub fn attribute(&self, key: &str) -> Option<&ArgumentValue> {
        self.attributes.get(key)
    }

    fn attribute_str(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key) {
            Some(ArgumentValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// This snippet with `$modifier_class` filled in for `modifier`
    pub fn variant_for(&self, modifier: &Modifier) -> Snippet {
        let seed = if self.variant_seed.is_empty() {
            &self.text
        } else {
            &self.variant_seed
        };
        Snippet {
            text: seed.replace(
                block_parser::MODIFIER_CLASS_TOKEN,
                &format!(" {}", modifier.class_name()),
            ),
            ..self.clone()
        }
    }

    /// Render the text as a fenced code block tagged with its syntax
    pub fn to_html(&self, renderer: &dyn MarkdownRenderer) -> String {
        let markdown = format!("```{}\n{}\n```", self.syntax(), self.text);
        renderer.to_html(&markdown)
    }
}

/// A documented class or pseudo-class variant of a section's element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Selector fragment as written, e.g. `.primary` or `:hover`
    pub name: String,
    pub description: String,
    /// One variant per section example, with `$modifier_class` filled in
    #[serde(default)]
    pub examples: Vec<Snippet>,
    /// One variant per section markup, with `$modifier_class` filled in
    #[serde(default)]
    pub markups: Vec<Snippet>,
}

impl Modifier {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            examples: Vec::new(),
            markups: Vec::new(),
        }
    }

    /// CSS class form of the name: `.a.b` becomes `a b`, `:hover` becomes `pseudo-class-hover`
    pub fn class_name(&self) -> String {
        self.name
            .replace('.', " ")
            .replace(':', " pseudo-class-")
            .trim()
            .to_string()
    }

    pub fn description_html(&self, renderer: &dyn MarkdownRenderer) -> String {
        renderer.to_html(&self.description)
    }
}

/// Documentation parsed from one comment block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub title: Option<String>,
    pub description: String,
    pub modifiers: Vec<Modifier>,
    pub examples: Vec<Snippet>,
    pub markups: Vec<Snippet>,
    /// Parsed reference; `None` when the block has no `Styleguide` line
    pub reference: Option<ParsedReference>,
    pub merge_type: MergeType,
    pub source_filename: String,
}

impl Section {
    /// Parse a comment block with the default argument parser
    pub fn parse(block: &RawCommentBlock) -> Result<Self> {
        BlockParser::new().parse(block)
    }

    /// Parse raw comment text attributed to `source_filename`
    pub fn from_comment(text: &str, source_filename: &str) -> Result<Self> {
        Self::parse(&RawCommentBlock {
            text: text.to_string(),
            source_filename: source_filename.to_string(),
        })
    }

    /// Normalized reference, e.g. `1.3.hello` for `1.3.10:hello`
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_ref().map(|r| r.normalized.as_str())
    }

    /// Reference text as written after the keyword
    pub fn raw_reference(&self) -> Option<&str> {
        self.reference.as_ref().map(|r| r.raw.as_str())
    }

    pub fn reference_segments(&self) -> &[String] {
        self.reference
            .as_ref()
            .map(|r| r.segments.as_slice())
            .unwrap_or(&[])
    }

    pub fn raw_reference_segments(&self) -> &[String] {
        self.reference
            .as_ref()
            .map(|r| r.raw_segments.as_slice())
            .unwrap_or(&[])
    }

    pub fn sort_key(&self) -> Option<u64> {
        self.reference.as_ref().and_then(|r| r.sort_key)
    }

    /// The reference, or [`KssError::NotASection`] when the block has none
    pub fn require_reference(&self) -> Result<&ParsedReference> {
        self.reference.as_ref().ok_or_else(|| KssError::NotASection {
            filename: self.source_filename.clone(),
        })
    }

    /// Plain sections with a reference end up in the published document
    pub fn is_publishable(&self) -> bool {
        self.reference.is_some() && !self.merge_type.is_merge()
    }

    pub fn has_examples(&self) -> bool {
        !self.examples.is_empty()
    }

    pub fn has_multiple_examples(&self) -> bool {
        self.examples.len() > 1
    }

    pub fn has_markups(&self) -> bool {
        !self.markups.is_empty()
    }

    pub fn description_html(&self, renderer: &dyn MarkdownRenderer) -> String {
        renderer.to_html(&self.description)
    }
}
