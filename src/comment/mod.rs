//! Comment extraction
//!
//! Finds `//` and `/* ... */` comment regions in stylesheet text and turns
//! each contiguous region into a normalized block of plain text.

pub mod extractor;

pub use extractor::{
    is_multi_line_comment_end, is_multi_line_comment_start, is_single_line_comment,
    parse_multi_line, parse_single_line, CommentExtractor, RawCommentBlock,
};
