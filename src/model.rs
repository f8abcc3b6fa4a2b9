use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Lenient field readers ──
//
// The host is not validated: a field that is `null` or of the wrong type
// reads as its default instead of rejecting the whole record.

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Epoch millis may arrive as a float from a JS host
fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or_default(),
        _ => 0,
    })
}

/// Keeps the string entries of a list and skips the rest
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// ── Annotation ──

/// A position inside a source file, 0-based as the host sends it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "lenient")]
    pub line: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub character: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    #[serde(default, deserialize_with = "lenient")]
    pub start: Position,
    #[serde(default, deserialize_with = "lenient")]
    pub end: Position,
}

impl SourceRange {
    /// Human-facing line label using 1-based line numbers
    pub fn line_label(&self) -> String {
        let start = self.start.line.saturating_add(1);
        let end = self.end.line.saturating_add(1);
        if end <= start {
            format!("Line {}", start)
        } else {
            format!("Lines {}-{}", start, end)
        }
    }
}

/// A note anchored to a source range. Opaque to the view: every field is
/// rendered as received and missing or mistyped fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub file_path: String,
    #[serde(default, deserialize_with = "lenient")]
    pub range: SourceRange,
    #[serde(default, deserialize_with = "lenient")]
    pub resolved: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: String,
    /// Source text captured when the annotation was created
    #[serde(default, deserialize_with = "lenient")]
    pub code_snippet: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: String,
    /// Creation time in epoch millis
    #[serde(default, deserialize_with = "lenient_millis")]
    pub timestamp: i64,
}

// ── Stats ──

/// Aggregate counts computed by the host. Each count is read independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "lenient")]
    pub total: usize,
    #[serde(default, deserialize_with = "lenient")]
    pub unresolved: usize,
    #[serde(default, deserialize_with = "lenient")]
    pub resolved: usize,
    /// Number of distinct files carrying annotations
    #[serde(default, deserialize_with = "lenient")]
    pub files: usize,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,
}
