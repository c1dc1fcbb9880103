//! Dotted-key flattening shared by the stats and advancement decoders

use serde_json::Value;
use std::fmt;

/// Composite row key: the dotted path of a flattened leaf, at most
/// [`MAX_SEGMENTS`] segments after collapsing.
///
/// For leaderboard addressing the *category* is the second-to-last segment
/// and the *metric* is the last one, which keeps lookups uniform whether or
/// not the source document nests its counters under a wrapper object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey(Vec<String>);

/// Keys deeper than this collapse into their 3-segment prefix; colliding
/// values are summed by the decoders.
pub const MAX_SEGMENTS: usize = 3;

impl RowKey {
    pub fn new(mut segments: Vec<String>) -> Self {
        segments.truncate(MAX_SEGMENTS);
        RowKey(segments)
    }

    /// Build a key from a dotted path string.
    pub fn from_dotted(path: &str) -> Self {
        RowKey::new(path.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn category(&self) -> Option<&str> {
        let n = self.0.len();
        if n >= 2 {
            Some(&self.0[n - 2])
        } else {
            None
        }
    }

    pub fn metric(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Flatten nested JSON objects into (segments, leaf) pairs.
///
/// Nested object keys are joined with `.` and the joined path is split on
/// `.` again, so a key that itself contains a dot contributes one segment
/// per dotted part - the same addressing the source data uses. Anything
/// that is not an object (numbers, strings, booleans, arrays) is a leaf.
pub fn flatten_dotted(value: &Value) -> Vec<(Vec<String>, Value)> {
    let mut leaves = Vec::new();
    walk(value, "", &mut leaves);
    leaves
}

fn walk(value: &Value, prefix: &str, leaves: &mut Vec<(Vec<String>, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                walk(child, &path, leaves);
            }
        }
        leaf => {
            if !prefix.is_empty() {
                let segments = prefix.split('.').map(str::to_string).collect();
                leaves.push((segments, leaf.clone()));
            }
        }
    }
}
