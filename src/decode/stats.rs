//! Stat counter decoding from per-player JSON documents

use super::flatten::{flatten_dotted, RowKey};
use super::DecodeError;
use serde_json::Value;
use std::collections::BTreeMap;

/// One player's normalized stat counters, keyed by composite path.
#[derive(Debug, Clone, Default)]
pub struct StatRecord {
    pub values: BTreeMap<RowKey, i64>,
}

impl StatRecord {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Decode a raw stats document into a [`StatRecord`].
///
/// Nested counters flatten to dotted paths of at most
/// [`MAX_SEGMENTS`](super::flatten::MAX_SEGMENTS) segments; deeper paths
/// (a metric id containing a dot) collapse into
/// their 3-segment prefix and colliding values are summed. Top-level
/// scalars such as format-version markers produce single-segment paths and
/// are dropped - they are not stats.
pub fn decode_stats(bytes: &[u8]) -> Result<StatRecord, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)?;
    let mut values: BTreeMap<RowKey, i64> = BTreeMap::new();

    for (segments, leaf) in flatten_dotted(&root) {
        if segments.len() < 2 {
            continue;
        }
        let Some(count) = leaf.as_i64() else {
            log::debug!("skipping non-integer stat leaf {}", segments.join("."));
            continue;
        };
        *values.entry(RowKey::new(segments)).or_insert(0) += count;
    }

    Ok(StatRecord { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_covers_leaf_metrics() {
        let raw = br#"{"stats":{"minecraft:custom":{"minecraft:jump":5,"minecraft:deaths":2},"minecraft:mined":{"minecraft:stone":100}},"DataVersion":3465}"#;
        let record = decode_stats(raw).unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(
            record.values[&RowKey::from_dotted("stats.minecraft:custom.minecraft:jump")],
            5
        );
        assert_eq!(
            record.values[&RowKey::from_dotted("stats.minecraft:mined.minecraft:stone")],
            100
        );
    }

    #[test]
    fn test_version_marker_dropped() {
        let raw = br#"{"DataVersion":3465,"stats":{"minecraft:custom":{"minecraft:jump":1}}}"#;
        let record = decode_stats(raw).unwrap();

        assert_eq!(record.len(), 1);
        assert!(record
            .values
            .keys()
            .all(|k| k.segments() != ["DataVersion"]));
    }

    #[test]
    fn test_dotted_leaf_collision_sums() {
        // Metric ids that themselves contain a dot collapse onto the same
        // 3-segment prefix and sum.
        let raw = br#"{"a":{"b":{"c.d":3,"c.e":4}}}"#;
        let record = decode_stats(raw).unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.values[&RowKey::from_dotted("a.b.c")], 7);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            decode_stats(b"{\"stats\": nope"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_two_level_document() {
        let raw = br#"{"minecraft:custom":{"minecraft:jump":5}}"#;
        let record = decode_stats(raw).unwrap();

        let key = RowKey::from_dotted("minecraft:custom.minecraft:jump");
        assert_eq!(record.values[&key], 5);
        assert_eq!(key.category(), Some("minecraft:custom"));
    }
}
