//! Styleguide reference parsing.
//!
//! References are dotted paths such as `2.1.3` or `buttons.10:primary`.
//! Only the last segment may carry an explicit `N:` sort-key prefix; it is
//! stripped from the normalized reference, which is what identifies a
//! section across files.

use serde::{Deserialize, Serialize};

use crate::error::{KssError, Result};

/// A reference split into its normalized and raw forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReference {
    /// Reference as written, e.g. `1.3.10:hello`
    pub raw: String,
    /// Reference with the sort-key prefix removed, e.g. `1.3.hello`
    pub normalized: String,
    pub segments: Vec<String>,
    pub raw_segments: Vec<String>,
    /// Sort key of the last segment
    pub sort_key: Option<u64>,
}

impl ParsedReference {
    pub fn last_segment(&self) -> &str {
        self.segments.last().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

pub struct ReferenceResolver;

impl ReferenceResolver {
    pub fn resolve(raw: &str) -> Result<ParsedReference> {
        if raw.is_empty() {
            return Err(malformed(raw, "reference has no segments"));
        }

        let raw_segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        let (last, parents) = raw_segments
            .split_last()
            .ok_or_else(|| malformed(raw, "reference has no segments"))?;

        for segment in parents {
            if !is_plain_segment(segment) {
                return Err(malformed(
                    raw,
                    &format!("segment \"{}\" must match [a-z0-9_-]+", segment),
                ));
            }
        }

        let (sort_key, normalized_last) = Self::resolve_last_segment(raw, last)?;

        let mut segments: Vec<String> = parents.to_vec();
        segments.push(normalized_last);

        Ok(ParsedReference {
            raw: raw.to_string(),
            normalized: segments.join("."),
            segments,
            raw_segments,
            sort_key,
        })
    }

    fn resolve_last_segment(raw: &str, segment: &str) -> Result<(Option<u64>, String)> {
        if let Some((prefix, rest)) = segment.split_once(':') {
            if !is_digits(prefix) || !is_plain_segment(rest) {
                return Err(malformed(
                    raw,
                    &format!(
                        "last segment \"{}\" must match [a-z0-9_-]+ or [0-9]+:[a-z0-9_-]+",
                        segment
                    ),
                ));
            }
            let key = parse_sort_key(raw, prefix)?;
            return Ok((Some(key), rest.to_string()));
        }

        if !is_plain_segment(segment) {
            return Err(malformed(
                raw,
                &format!("segment \"{}\" must match [a-z0-9_-]+", segment),
            ));
        }

        if is_digits(segment) {
            let key = parse_sort_key(raw, segment)?;
            Ok((Some(key), segment.to_string()))
        } else {
            Ok((None, segment.to_string()))
        }
    }
}

/// Natural sort key of a single normalized segment: its value when it is all digits
pub fn segment_sort_key(segment: &str) -> Option<u64> {
    if is_digits(segment) {
        segment.parse().ok()
    } else {
        None
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_plain_segment(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

fn parse_sort_key(raw: &str, digits: &str) -> Result<u64> {
    digits
        .parse()
        .map_err(|_| malformed(raw, &format!("sort key {} is out of range", digits)))
}

fn malformed(raw: &str, reason: &str) -> KssError {
    KssError::MalformedReference {
        reference: raw.to_string(),
        reason: reason.to_string(),
    }
}
