//! Line scanner for stylesheet comments.
//!
//! A block is either a run of consecutive `//` lines or one `/* ... */`
//! region. Inside an open `/*` region a line only closes the region when
//! `*/` is its last non-whitespace token, so markers quoted in the middle
//! of a sentence never cut a block short. On the opening line itself the
//! first `*/` closes the comment and the rest of the line is code.
//!
//! A `*` gutter is removed only when every non-blank line after the opener
//! carries one, so Markdown bullets in a gutterless comment survive.

use serde::{Deserialize, Serialize};

const SINGLE_LINE_MARKER: &str = "//";
const BLOCK_START_MARKER: &str = "/*";
const BLOCK_END_MARKER: &str = "*/";

/// One normalized comment region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommentBlock {
    /// Comment text with delimiters, gutters and common indentation removed
    pub text: String,
    /// Base name of the file the comment came from
    pub source_filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    SingleLine,
    MultiLine,
}

/// Extracts comment blocks from stylesheet source text
#[derive(Debug, Clone, Default)]
pub struct CommentExtractor {
    variables: Vec<(String, String)>,
}

impl CommentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal token substitutions applied, in order, to every block
    pub fn with_variables(variables: Vec<(String, String)>) -> Self {
        Self { variables }
    }

    /// Extract the normalized blocks of `source` in file order
    pub fn extract(&self, source: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut state = ScanState::Outside;

        for line in source.lines() {
            if state == ScanState::MultiLine {
                if is_multi_line_comment_end(line) {
                    current.push(strip_block_end(line).to_string());
                    self.flush_block(&mut current, &mut blocks);
                    state = ScanState::Outside;
                } else {
                    current.push(line.to_string());
                }
                continue;
            }

            if is_single_line_comment(line) {
                current.push(parse_single_line(line).to_string());
                state = ScanState::SingleLine;
            } else if is_multi_line_comment_start(line) {
                // A `//` run directly above a block comment is its own block
                self.flush(&mut current, &mut blocks);

                // On the opening line the first `*/` closes; anything after it is code
                let body = strip_block_start(line);
                match body.find(BLOCK_END_MARKER) {
                    Some(end) => {
                        current.push(strip_docblock_star(&body[..end]).to_string());
                        self.flush(&mut current, &mut blocks);
                        state = ScanState::Outside;
                    }
                    None => {
                        current.push(strip_docblock_star(body).to_string());
                        state = ScanState::MultiLine;
                    }
                }
            } else {
                self.flush(&mut current, &mut blocks);
                state = ScanState::Outside;
            }
        }

        // An unterminated block comment still yields its text
        if state == ScanState::MultiLine {
            self.flush_block(&mut current, &mut blocks);
        } else {
            self.flush(&mut current, &mut blocks);
        }

        blocks
    }

    /// Extract blocks tagged with the file they came from
    pub fn extract_blocks(&self, source_filename: &str, source: &str) -> Vec<RawCommentBlock> {
        self.extract(source)
            .into_iter()
            .map(|text| RawCommentBlock {
                text,
                source_filename: source_filename.to_string(),
            })
            .collect()
    }

    /// Flush a `/* */` region, removing the `*` gutter when every body line has one
    fn flush_block(&self, current: &mut Vec<String>, blocks: &mut Vec<String>) {
        let mut body = current.iter().skip(1).filter(|l| !l.trim().is_empty());
        let guttered = match body.next() {
            Some(first) => has_gutter(first) && body.all(|l| has_gutter(l)),
            None => false,
        };
        if guttered {
            for line in current.iter_mut().skip(1) {
                if has_gutter(line) {
                    *line = strip_gutter(line).to_string();
                }
            }
        }
        self.flush(current, blocks);
    }

    fn flush(&self, current: &mut Vec<String>, blocks: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }

        let mut text = dedent_and_trim(current.as_slice());
        current.clear();

        for (token, replacement) in &self.variables {
            text = text.replace(token.as_str(), replacement);
        }

        if !text.is_empty() {
            blocks.push(text);
        }
    }
}

/// True when the first non-whitespace token of the line is `//`
pub fn is_single_line_comment(line: &str) -> bool {
    line.trim_start().starts_with(SINGLE_LINE_MARKER)
}

/// True when the first non-whitespace token of the line is `/*`
pub fn is_multi_line_comment_start(line: &str) -> bool {
    line.trim_start().starts_with(BLOCK_START_MARKER)
}

/// True when `*/` is the last non-whitespace token of the line
pub fn is_multi_line_comment_end(line: &str) -> bool {
    line.trim_end().ends_with(BLOCK_END_MARKER)
}

/// Text of a `//` line without its marker
pub fn parse_single_line(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix(SINGLE_LINE_MARKER).unwrap_or(trimmed)
}

/// Text of a one-line `/* ... */` comment without its markers
pub fn parse_multi_line(line: &str) -> String {
    let body = strip_block_start(line);
    let body = match body.find(BLOCK_END_MARKER) {
        Some(end) => &body[..end],
        None => body,
    };
    strip_docblock_star(body).trim_end().to_string()
}

fn strip_block_start(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix(BLOCK_START_MARKER).unwrap_or(trimmed)
}

fn strip_block_end(line: &str) -> &str {
    let trimmed = line.trim_end();
    trimmed.strip_suffix(BLOCK_END_MARKER).unwrap_or(trimmed)
}

/// The extra `*` of a `/**` opener
fn strip_docblock_star(body: &str) -> &str {
    body.strip_prefix('*').unwrap_or(body)
}

/// ` * text` style line; the `*/` terminator is not a gutter
fn has_gutter(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('*') && !trimmed.starts_with(BLOCK_END_MARKER)
}

fn strip_gutter(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix('*').unwrap_or(line)
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Remove the indentation shared by all non-blank lines, join and trim
pub(crate) fn dedent_and_trim<S: AsRef<str>>(lines: &[S]) -> String {
    let indent = lines
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.trim().is_empty())
        .map(indent_width)
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let line = line.as_ref().trim_end();
            match line.char_indices().nth(indent) {
                Some((offset, _)) => &line[offset..],
                None => "",
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
