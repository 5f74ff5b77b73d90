//! Argument strings on `Markup:` and `Example:` lines.
//!
//! ```text
//! Markup: (scss) Primary button
//! Example: title="Disabled state" type=isolated height=200
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "";
pub const DEFAULT_SYNTAX: &str = "html";
pub const DEFAULT_TYPE: &str = "embedded";

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ArgumentValue {
    /// Type a bare (unquoted) value
    pub fn infer(raw: &str) -> Self {
        match raw {
            "true" => return ArgumentValue::Bool(true),
            "false" => return ArgumentValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return ArgumentValue::Integer(i);
        }
        if raw.contains('.') {
            if let Ok(f) = raw.parse::<f64>() {
                if f.is_finite() {
                    return ArgumentValue::Float(f);
                }
            }
        }
        ArgumentValue::String(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Bool(b) => write!(f, "{}", b),
            ArgumentValue::Integer(i) => write!(f, "{}", i),
            ArgumentValue::Float(x) => write!(f, "{}", x),
            ArgumentValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

pub type ArgumentMap = BTreeMap<String, ArgumentValue>;

/// Turns an argument string into attributes
pub trait ArgumentParser: Send + Sync {
    fn parse(&self, argument_string: &str) -> ArgumentMap;
}

/// `key=value` pairs, a leading `(syntax)` word and free title words
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueArgumentParser;

enum Token {
    Word(String),
    Pair(String, ArgumentValue),
}

impl KeyValueArgumentParser {
    fn tokenize(input: &str) -> Vec<Token> {
        let chars: Vec<char> = input.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' {
                i += 1;
            }
            let key: String = chars[start..i].iter().collect();

            if i < chars.len() && chars[i] == '=' && !key.is_empty() {
                i += 1;
                let value = match chars.get(i) {
                    Some(&quote) if quote == '"' || quote == '\'' => {
                        i += 1;
                        let mut value = String::new();
                        while i < chars.len() && chars[i] != quote {
                            if chars[i] == '\\' && chars.get(i + 1) == Some(&quote) {
                                i += 1;
                            }
                            value.push(chars[i]);
                            i += 1;
                        }
                        // closing quote
                        i += 1;
                        ArgumentValue::String(value)
                    }
                    _ => {
                        let value_start = i;
                        while i < chars.len() && !chars[i].is_whitespace() {
                            i += 1;
                        }
                        let raw: String = chars[value_start..i].iter().collect();
                        ArgumentValue::infer(&raw)
                    }
                };
                tokens.push(Token::Pair(key, value));
            } else {
                // A stray `=` belongs to the word
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
        }

        tokens
    }
}

impl ArgumentParser for KeyValueArgumentParser {
    fn parse(&self, argument_string: &str) -> ArgumentMap {
        let mut map = ArgumentMap::new();
        let mut title_words: Vec<String> = Vec::new();
        let mut pairs: Vec<(String, ArgumentValue)> = Vec::new();

        for token in Self::tokenize(argument_string) {
            match token {
                Token::Word(word) => {
                    let is_syntax = title_words.is_empty()
                        && !map.contains_key("syntax")
                        && word.len() > 2
                        && word.starts_with('(')
                        && word.ends_with(')');
                    if is_syntax {
                        map.insert(
                            "syntax".to_string(),
                            ArgumentValue::from(&word[1..word.len() - 1]),
                        );
                    } else {
                        title_words.push(word);
                    }
                }
                Token::Pair(key, value) => pairs.push((key, value)),
            }
        }

        if !title_words.is_empty() {
            map.insert(
                "title".to_string(),
                ArgumentValue::String(title_words.join(" ")),
            );
        }

        // Explicit pairs win over the positional forms
        map.extend(pairs);
        map
    }
}

/// Attributes for a snippet: defaults overlaid with whatever the parser finds
pub fn derive_attributes(
    argument_string: Option<&str>,
    parser: &dyn ArgumentParser,
) -> ArgumentMap {
    let mut attributes = ArgumentMap::new();
    attributes.insert("title".to_string(), ArgumentValue::from(DEFAULT_TITLE));
    attributes.insert("syntax".to_string(), ArgumentValue::from(DEFAULT_SYNTAX));
    attributes.insert("type".to_string(), ArgumentValue::from(DEFAULT_TYPE));

    if let Some(argument_string) = argument_string {
        attributes.extend(parser.parse(argument_string));
    }

    attributes
}
