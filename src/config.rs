//! `.kss.yml` project configuration

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use crate::error::{KssError, Result};

pub const CONFIG_FILENAME: &str = ".kss.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleguideConfig {
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Empty means the default stylesheet extensions
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub variables: VariableMap,
}

impl StyleguideConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        from_yaml(&content)
            .map_err(|e| KssError::Config(format!("Invalid YAML in {}: {}", path.display(), e)))
    }

    /// Load `.kss.yml` from `dir` if there is one
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            return Ok(None);
        }
        tracing::debug!("Using config {}", candidate.display());
        Self::load(&candidate).map(Some)
    }
}

pub fn parse_config(content: &str) -> Result<StyleguideConfig> {
    from_yaml(content).map_err(|e| KssError::Config(format!("Invalid YAML: {}", e)))
}

fn from_yaml(content: &str) -> std::result::Result<StyleguideConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(StyleguideConfig::default());
    }
    serde_yaml::from_str(content)
}

/// Substitution table that keeps the order it was written in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap(Vec<(String, String)>);

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends; a token already present keeps its first position and takes the new value
    pub fn insert(&mut self, token: impl Into<String>, replacement: impl Into<String>) {
        let token = token.into();
        let replacement = replacement.into();
        match self.0.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = replacement,
            None => self.0.push((token, replacement)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(t, r)| (t.as_str(), r.as_str()))
    }

    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

impl From<Vec<(String, String)>> for VariableMap {
    fn from(entries: Vec<(String, String)>) -> Self {
        let mut map = Self::new();
        for (token, replacement) in entries {
            map.insert(token, replacement);
        }
        map
    }
}

impl Serialize for VariableMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(t, r)| (t, r)))
    }
}

impl<'de> Deserialize<'de> for VariableMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mapping = Option::<Mapping>::deserialize(deserializer)?.unwrap_or_default();
        let mut variables = VariableMap::new();

        for (key, value) in mapping {
            let token = scalar_text(&key)
                .ok_or_else(|| de::Error::custom(ScalarExpected("variable name")))?;
            let replacement = scalar_text(&value)
                .ok_or_else(|| de::Error::custom(ScalarExpected("variable value")))?;
            variables.insert(token, replacement);
        }

        Ok(variables)
    }
}

struct ScalarExpected(&'static str);

impl fmt::Display for ScalarExpected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be a string, number or boolean", self.0)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Split a `KEY=VALUE` command-line pair at the first `=`
pub fn parse_variable_arg(arg: &str) -> std::result::Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{}\"", arg))
}
