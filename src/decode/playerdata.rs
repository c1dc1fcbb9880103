//! Economy extraction from binary player saves

use super::nbt;
use super::DecodeError;

/// Raw currency is stored in the smallest denomination; 10000 raw units
/// make one displayed coin.
const CURRENCY_SCALE: i64 = 10_000;

/// Save-tree path to the raw currency leaf.
pub const CURRENCY_PATH: [&str; 3] = [
    "cardinal_components",
    "numismatic-overhaul:currency",
    "Value",
];

/// Save-tree path to the list of placed waystones.
pub const WAYSTONES_PATH: [&str; 3] = ["BalmData", "WaystonesData", "Waystones"];

/// One player's economy figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomyRecord {
    pub money: i64,
    pub waystone_count: usize,
}

/// Decode a player save into an [`EconomyRecord`].
///
/// Returns [`DecodeError::MissingPath`] when either fixed path is absent,
/// which is the normal state for players who never touched currency or
/// waystones - callers treat it as "no economy record", not a failure.
pub fn decode_playerdata(bytes: &[u8]) -> Result<EconomyRecord, DecodeError> {
    let root = nbt::parse(bytes)?;

    let raw_currency = root
        .get_path(&CURRENCY_PATH)?
        .as_i64()
        .ok_or_else(|| DecodeError::Malformed("currency leaf is not numeric".to_string()))?;

    let waystones = root
        .get_path(&WAYSTONES_PATH)?
        .as_list()
        .ok_or_else(|| DecodeError::Malformed("waystone entry is not a list".to_string()))?;

    Ok(EconomyRecord {
        // floor division, so negative balances round down too
        money: raw_currency.div_euclid(CURRENCY_SCALE),
        waystone_count: waystones.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::nbt::Tag;
    use std::collections::BTreeMap;

    // Build the fixture tree in memory, then serialize it by hand.
    fn encode_named(out: &mut Vec<u8>, name: &str, tag: &Tag) {
        out.push(type_id(tag));
        out.extend((name.len() as u16).to_be_bytes());
        out.extend(name.as_bytes());
        encode_payload(out, tag);
    }

    fn type_id(tag: &Tag) -> u8 {
        match tag {
            Tag::Long(_) => 4,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            _ => unreachable!("fixture uses longs, lists and compounds only"),
        }
    }

    fn encode_payload(out: &mut Vec<u8>, tag: &Tag) {
        match tag {
            Tag::Long(v) => out.extend(v.to_be_bytes()),
            Tag::List(items) => {
                out.push(items.first().map_or(0, type_id));
                out.extend((items.len() as i32).to_be_bytes());
                for item in items {
                    encode_payload(out, item);
                }
            }
            Tag::Compound(children) => {
                for (name, child) in children {
                    encode_named(out, name, child);
                }
                out.push(0);
            }
            _ => unreachable!(),
        }
    }

    fn compound(entries: Vec<(&str, Tag)>) -> Tag {
        Tag::Compound(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn save_bytes(root: &Tag) -> Vec<u8> {
        let mut out = Vec::new();
        encode_named(&mut out, "", root);
        out
    }

    fn full_save(raw_currency: i64, waystones: usize) -> Vec<u8> {
        let stones = (0..waystones)
            .map(|_| compound(vec![]))
            .collect::<Vec<_>>();
        let root = compound(vec![
            (
                "cardinal_components",
                compound(vec![(
                    "numismatic-overhaul:currency",
                    compound(vec![("Value", Tag::Long(raw_currency))]),
                )]),
            ),
            (
                "BalmData",
                compound(vec![(
                    "WaystonesData",
                    compound(vec![("Waystones", Tag::List(stones))]),
                )]),
            ),
        ]);
        save_bytes(&root)
    }

    #[test]
    fn test_money_floors_raw_currency() {
        let record = decode_playerdata(&full_save(123_456, 0)).unwrap();
        assert_eq!(record.money, 12);
    }

    #[test]
    fn test_negative_balance_floors_down() {
        let record = decode_playerdata(&full_save(-15_000, 0)).unwrap();
        assert_eq!(record.money, -2);
    }

    #[test]
    fn test_waystone_count() {
        let record = decode_playerdata(&full_save(0, 3)).unwrap();
        assert_eq!(record.waystone_count, 3);
    }

    #[test]
    fn test_absent_path_is_missing_not_malformed() {
        let bytes = save_bytes(&compound(vec![("Inventory", Tag::List(vec![]))]));
        let err = decode_playerdata(&bytes).unwrap_err();
        assert!(err.is_missing_path());
    }
}
