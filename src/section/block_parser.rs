//! Line classifier for one comment block.
//!
//! The first line is taken as the title. Every following line is matched
//! against [`LINE_RULES`] in order and the first rule that matches decides
//! what happens to it:
//!
//! | rule                   | matches                                          |
//! |------------------------|--------------------------------------------------|
//! | `Reference`            | `Styleguide` keyword, optional merge suffix, ref |
//! | `Modifier`             | line starts with `.` or `:`                      |
//! | `ModifierContinuation` | in modifiers, indented, starts with a word char  |
//! | `MarkupStart`          | `Markup:`                                        |
//! | `MarkupBody`           | in markup, blank or indented by two              |
//! | `ExampleStart`         | `Example:`                                       |
//! | `ExampleBody`          | in example, blank or indented by two             |
//! | `Description`          | anything else                                    |

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::arguments::{derive_attributes, ArgumentParser, KeyValueArgumentParser};
use super::reference::ReferenceResolver;
use super::{MergeType, Modifier, Section, Snippet};
use crate::comment::extractor::dedent_and_trim;
use crate::comment::RawCommentBlock;
use crate::error::Result;

pub const REFERENCE_KEYWORD: &str = "Styleguide";
pub const MARKUP_KEYWORD: &str = "Markup:";
pub const EXAMPLE_KEYWORD: &str = "Example:";
pub const MODIFIER_CLASS_TOKEN: &str = "$modifier_class";

const CLASS_MODIFIER: char = '.';
const PSEUDO_CLASS_MODIFIER: char = ':';
const MODIFIER_DESCRIPTION_SEPARATOR: &str = " - ";

/// `[...]?` marks text that only appears in modifier variants
static OPTIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\?").expect("optional marker regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Nothing consumed yet; the next line is the title
    TitlePending,
    Default,
    InModifiers,
    InMarkup,
    InExample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    Reference,
    Modifier,
    ModifierContinuation,
    MarkupStart,
    MarkupBody,
    ExampleStart,
    ExampleBody,
    Description,
}

/// Rules in priority order; the first match wins
pub const LINE_RULES: [LineRule; 8] = [
    LineRule::Reference,
    LineRule::Modifier,
    LineRule::ModifierContinuation,
    LineRule::MarkupStart,
    LineRule::MarkupBody,
    LineRule::ExampleStart,
    LineRule::ExampleBody,
    LineRule::Description,
];

impl LineRule {
    pub fn matches(self, line: &str, state: ParserState, has_modifier: bool) -> bool {
        match self {
            LineRule::Reference => parse_reference_line(line).is_some(),
            LineRule::Modifier => {
                line.starts_with(CLASS_MODIFIER) || line.starts_with(PSEUDO_CLASS_MODIFIER)
            }
            LineRule::ModifierContinuation => {
                state == ParserState::InModifiers
                    && has_modifier
                    && continuation_text(line).is_some()
            }
            LineRule::MarkupStart => line.starts_with(MARKUP_KEYWORD),
            LineRule::MarkupBody => state == ParserState::InMarkup && is_snippet_body(line),
            LineRule::ExampleStart => line.starts_with(EXAMPLE_KEYWORD),
            LineRule::ExampleBody => state == ParserState::InExample && is_snippet_body(line),
            LineRule::Description => true,
        }
    }
}

/// Pick the rule that handles `line`
pub fn classify_line(line: &str, state: ParserState, has_modifier: bool) -> LineRule {
    LINE_RULES
        .iter()
        .copied()
        .find(|rule| rule.matches(line, state, has_modifier))
        .unwrap_or(LineRule::Description)
}

/// Split a reference line into its merge kind and reference text
///
/// The keyword and suffix must be followed by whitespace or end the line,
/// so prose such as `Styleguides are...` is not a reference.
pub fn parse_reference_line(line: &str) -> Option<(MergeType, &str)> {
    let rest = line.strip_prefix(REFERENCE_KEYWORD)?;
    let (merge_type, rest) = MergeType::MERGE_KINDS
        .iter()
        .find_map(|kind| rest.strip_prefix(kind.keyword_suffix()).map(|r| (*kind, r)))
        .unwrap_or((MergeType::Plain, rest));

    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some((merge_type, rest.trim().trim_end_matches('.')))
}

fn continuation_text(line: &str) -> Option<&str> {
    if !line.starts_with(char::is_whitespace) {
        return None;
    }
    let text = line.trim();
    let first = text.chars().next()?;
    if first.is_alphanumeric() || first == '_' {
        Some(text)
    } else {
        None
    }
}

fn is_snippet_body(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with("  ") || line.starts_with('\t')
}

fn keyword_argument(line: &str, keyword: &str) -> Option<String> {
    let rest = line[keyword.len()..].trim();
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn strip_blank_lines(lines: &[String]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n").trim_end().to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Default)]
struct PendingSnippet {
    argument_string: Option<String>,
    lines: Vec<String>,
}

#[derive(Debug)]
struct BlockState {
    state: ParserState,
    title_line: Option<String>,
    title_followed_by_blank: bool,
    description_lines: Vec<String>,
    modifiers: Vec<Modifier>,
    open_markup: Option<PendingSnippet>,
    open_example: Option<PendingSnippet>,
    markups: Vec<PendingSnippet>,
    examples: Vec<PendingSnippet>,
    merge_type: MergeType,
    raw_reference: Option<String>,
}

impl BlockState {
    fn new() -> Self {
        Self {
            state: ParserState::TitlePending,
            title_line: None,
            title_followed_by_blank: true,
            description_lines: Vec::new(),
            modifiers: Vec::new(),
            open_markup: None,
            open_example: None,
            markups: Vec::new(),
            examples: Vec::new(),
            merge_type: MergeType::Plain,
            raw_reference: None,
        }
    }

    fn apply(&mut self, rule: LineRule, line: &str) {
        match rule {
            LineRule::Reference => {
                if let Some((merge_type, reference)) = parse_reference_line(line) {
                    self.merge_type = merge_type;
                    self.raw_reference = if reference.is_empty() {
                        None
                    } else {
                        Some(reference.to_string())
                    };
                }
                self.state = ParserState::Default;
            }
            LineRule::Modifier => {
                self.state = ParserState::InModifiers;
                match line.split_once(MODIFIER_DESCRIPTION_SEPARATOR) {
                    Some((name, description)) => {
                        self.modifiers
                            .push(Modifier::new(name.trim(), description.trim()));
                    }
                    None => {
                        tracing::trace!("Skipping malformed modifier line: {}", line);
                    }
                }
            }
            LineRule::ModifierContinuation => {
                if let (Some(text), Some(last)) =
                    (continuation_text(line), self.modifiers.last_mut())
                {
                    last.description.push(' ');
                    last.description.push_str(text);
                }
            }
            LineRule::MarkupStart => {
                Self::close(&mut self.open_markup, &mut self.markups);
                self.open_markup = Some(PendingSnippet {
                    argument_string: keyword_argument(line, MARKUP_KEYWORD),
                    lines: Vec::new(),
                });
                self.state = ParserState::InMarkup;
            }
            LineRule::MarkupBody => {
                if let Some(markup) = self.open_markup.as_mut() {
                    markup.lines.push(line.to_string());
                }
            }
            LineRule::ExampleStart => {
                Self::close(&mut self.open_example, &mut self.examples);
                self.open_example = Some(PendingSnippet {
                    argument_string: keyword_argument(line, EXAMPLE_KEYWORD),
                    lines: Vec::new(),
                });
                self.state = ParserState::InExample;
            }
            LineRule::ExampleBody => {
                if let Some(example) = self.open_example.as_mut() {
                    example.lines.push(line.to_string());
                }
            }
            LineRule::Description => {
                self.state = ParserState::Default;
                self.description_lines.push(line.to_string());
            }
        }
    }

    fn close(open: &mut Option<PendingSnippet>, finished: &mut Vec<PendingSnippet>) {
        if let Some(pending) = open.take() {
            if !pending.lines.is_empty() {
                finished.push(pending);
            }
        }
    }

    fn finish(mut self, source_filename: &str, parser: &dyn ArgumentParser) -> Result<Section> {
        Self::close(&mut self.open_markup, &mut self.markups);
        Self::close(&mut self.open_example, &mut self.examples);

        let reference = match self.raw_reference.as_deref() {
            Some(raw) => Some(ReferenceResolver::resolve(raw)?),
            None => None,
        };

        // Merge blocks usually carry extra prose rather than a title of their own
        let title = match self.title_line {
            Some(line) if self.merge_type.is_merge() && !self.title_followed_by_blank => {
                self.description_lines.insert(0, line);
                None
            }
            Some(line) if !line.is_empty() => Some(line),
            _ => None,
        };

        let description = strip_blank_lines(&self.description_lines);
        let mut modifiers = self.modifiers;

        let mut examples = Vec::new();
        for pending in &self.examples {
            if let Some(snippet) = build_snippet(pending, source_filename, parser) {
                for modifier in modifiers.iter_mut() {
                    let variant = snippet.variant_for(modifier);
                    modifier.examples.push(variant);
                }
                examples.push(snippet);
            }
        }

        let mut markups = Vec::new();
        for pending in &self.markups {
            if let Some(snippet) = build_snippet(pending, source_filename, parser) {
                for modifier in modifiers.iter_mut() {
                    let variant = snippet.variant_for(modifier);
                    modifier.markups.push(variant);
                }
                markups.push(snippet);
            }
        }

        Ok(Section {
            title,
            description,
            modifiers,
            examples,
            markups,
            reference,
            merge_type: self.merge_type,
            source_filename: source_filename.to_string(),
        })
    }
}

/// The published snippet, carrying the text its modifier variants are built from
fn build_snippet(
    pending: &PendingSnippet,
    source_filename: &str,
    parser: &dyn ArgumentParser,
) -> Option<Snippet> {
    let text = dedent_and_trim(pending.lines.as_slice());
    if text.is_empty() {
        return None;
    }

    let primary = OPTIONAL_RE
        .replace_all(&text, "")
        .replace(MODIFIER_CLASS_TOKEN, "");
    let seed = OPTIONAL_RE.replace_all(&text, "${1}").into_owned();

    Some(Snippet {
        text: primary,
        argument_string: pending.argument_string.clone(),
        attributes: derive_attributes(pending.argument_string.as_deref(), parser),
        source_filename: source_filename.to_string(),
        variant_seed: seed,
    })
}

/// Parses comment blocks into [`Section`]s
#[derive(Clone)]
pub struct BlockParser {
    argument_parser: Arc<dyn ArgumentParser>,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser {
    pub fn new() -> Self {
        Self {
            argument_parser: Arc::new(KeyValueArgumentParser),
        }
    }

    pub fn with_argument_parser(argument_parser: Arc<dyn ArgumentParser>) -> Self {
        Self { argument_parser }
    }

    pub fn parse(&self, block: &RawCommentBlock) -> Result<Section> {
        let mut lines = block.text.trim().lines().map(str::trim_end);
        let mut state = BlockState::new();

        let Some(first) = lines.next() else {
            return Ok(Section {
                source_filename: block.source_filename.clone(),
                ..Section::default()
            });
        };

        let rest: Vec<&str> = lines.collect();
        state.title_line = Some(first.trim().to_string());
        state.title_followed_by_blank = rest.first().map_or(true, |l| l.trim().is_empty());
        state.state = ParserState::Default;

        for line in rest {
            let rule = classify_line(line, state.state, !state.modifiers.is_empty());
            state.apply(rule, line);
        }

        state.finish(&block.source_filename, self.argument_parser.as_ref())
    }
}
