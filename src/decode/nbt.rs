//! Minimal read-only parser for the binary player-save tag tree
//!
//! Player saves are (usually gzip-compressed) binary trees of named tags:
//! compounds, lists and primitive leaves, all big-endian. Only reading and
//! path navigation are supported; the economy decoder needs nothing more.

use super::DecodeError;
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::io::Read;

/// gzip magic bytes (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(Vec<Tag>),
    Compound(BTreeMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Child lookup on a compound; `None` for every other tag kind.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(children) => children.get(key),
            _ => None,
        }
    }

    /// Navigate a sequence of compound keys from this node.
    pub fn get_path(&self, path: &[&str]) -> Result<&Tag, DecodeError> {
        let mut node = self;
        for (depth, key) in path.iter().enumerate() {
            node = node
                .get(key)
                .ok_or_else(|| DecodeError::MissingPath(path[..=depth].join("/")))?;
        }
        Ok(node)
    }

    /// Integral value of a numeric leaf.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Byte(v) => Some(i64::from(*v)),
            Tag::Short(v) => Some(i64::from(*v)),
            Tag::Int(v) => Some(i64::from(*v)),
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a player-save blob into its root compound, inflating first when
/// the gzip magic is present.
pub fn parse(bytes: &[u8]) -> Result<Tag, DecodeError> {
    if bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut inflated)?;
        parse_root(&inflated)
    } else {
        parse_root(bytes)
    }
}

fn parse_root(bytes: &[u8]) -> Result<Tag, DecodeError> {
    let mut reader = Reader { buf: bytes, pos: 0 };
    let tag_type = reader.read_u8()?;
    if tag_type != TAG_COMPOUND {
        return Err(DecodeError::Malformed(format!(
            "root tag is type {}, expected a compound",
            tag_type
        )));
    }
    reader.read_name()?; // root name, normally empty
    read_payload(&mut reader, TAG_COMPOUND)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Malformed(format!(
                "truncated input: need {} bytes at offset {}",
                n, self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn read_i16(&mut self) -> Result<i16, DecodeError> {
        let b = self.take(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i64(&mut self) -> Result<i64, DecodeError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(i64::from_be_bytes(buf))
    }

    fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_i32()? as u32))
    }

    fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    fn read_name(&mut self) -> Result<String, DecodeError> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Bounds-check an element count against the bytes actually left, so a
    /// corrupt length prefix fails fast instead of allocating.
    fn check_len(&self, count: i32, elem_size: usize) -> Result<usize, DecodeError> {
        if count < 0 {
            return Err(DecodeError::Malformed(format!(
                "negative length {} at offset {}",
                count, self.pos
            )));
        }
        let count = count as usize;
        if count.saturating_mul(elem_size) > self.remaining() {
            return Err(DecodeError::Malformed(format!(
                "length {} exceeds remaining input at offset {}",
                count, self.pos
            )));
        }
        Ok(count)
    }
}

fn read_payload(reader: &mut Reader<'_>, tag_type: u8) -> Result<Tag, DecodeError> {
    match tag_type {
        TAG_BYTE => Ok(Tag::Byte(reader.read_u8()? as i8)),
        TAG_SHORT => Ok(Tag::Short(reader.read_i16()?)),
        TAG_INT => Ok(Tag::Int(reader.read_i32()?)),
        TAG_LONG => Ok(Tag::Long(reader.read_i64()?)),
        TAG_FLOAT => Ok(Tag::Float(reader.read_f32()?)),
        TAG_DOUBLE => Ok(Tag::Double(reader.read_f64()?)),
        TAG_BYTE_ARRAY => {
            let raw_len = reader.read_i32()?;
            let len = reader.check_len(raw_len, 1)?;
            Ok(Tag::ByteArray(reader.take(len)?.to_vec()))
        }
        TAG_STRING => Ok(Tag::String(reader.read_name()?)),
        TAG_LIST => {
            let elem_type = reader.read_u8()?;
            let raw_count = reader.read_i32()?;
            if elem_type == TAG_END && raw_count > 0 {
                return Err(DecodeError::Malformed(
                    "non-empty list of end tags".to_string(),
                ));
            }
            let count = reader.check_len(raw_count, 1)?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(read_payload(reader, elem_type)?);
            }
            Ok(Tag::List(items))
        }
        TAG_COMPOUND => {
            let mut children = BTreeMap::new();
            loop {
                let child_type = reader.read_u8()?;
                if child_type == TAG_END {
                    break;
                }
                let name = reader.read_name()?;
                let child = read_payload(reader, child_type)?;
                children.insert(name, child);
            }
            Ok(Tag::Compound(children))
        }
        TAG_INT_ARRAY => {
            let raw_len = reader.read_i32()?;
            let len = reader.check_len(raw_len, 4)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(reader.read_i32()?);
            }
            Ok(Tag::IntArray(items))
        }
        TAG_LONG_ARRAY => {
            let raw_len = reader.read_i32()?;
            let len = reader.check_len(raw_len, 8)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(reader.read_i64()?);
            }
            Ok(Tag::LongArray(items))
        }
        other => Err(DecodeError::Malformed(format!(
            "unknown tag type {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    // Hand-encoded fixture helpers. Tag layout: type byte, u16 name
    // length, name bytes, payload.
    fn named(tag_type: u8, name: &str) -> Vec<u8> {
        let mut out = vec![tag_type];
        out.extend((name.len() as u16).to_be_bytes());
        out.extend(name.as_bytes());
        out
    }

    fn long_tag(name: &str, value: i64) -> Vec<u8> {
        let mut out = named(TAG_LONG, name);
        out.extend(value.to_be_bytes());
        out
    }

    fn compound_tag(name: &str, children: &[Vec<u8>]) -> Vec<u8> {
        let mut out = named(TAG_COMPOUND, name);
        for child in children {
            out.extend(child);
        }
        out.push(TAG_END);
        out
    }

    fn root(children: &[Vec<u8>]) -> Vec<u8> {
        compound_tag("", children)
    }

    #[test]
    fn test_parse_nested_compound() {
        let bytes = root(&[compound_tag("outer", &[long_tag("value", 42)])]);
        let tree = parse(&bytes).unwrap();

        let leaf = tree.get_path(&["outer", "value"]).unwrap();
        assert_eq!(leaf.as_i64(), Some(42));
    }

    #[test]
    fn test_missing_path_names_the_prefix() {
        let bytes = root(&[compound_tag("outer", &[])]);
        let tree = parse(&bytes).unwrap();

        let err = tree.get_path(&["outer", "absent", "deeper"]).unwrap_err();
        assert!(matches!(err, DecodeError::MissingPath(ref p) if p == "outer/absent"));
    }

    #[test]
    fn test_gzip_sniffing() {
        let bytes = root(&[long_tag("value", 7)]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        let compressed = encoder.finish().unwrap();

        let tree = parse(&compressed).unwrap();
        assert_eq!(tree.get_path(&["value"]).unwrap().as_i64(), Some(7));
    }

    #[test]
    fn test_list_of_compounds() {
        let mut list = named(TAG_LIST, "items");
        list.push(TAG_COMPOUND);
        list.extend(2i32.to_be_bytes());
        for _ in 0..2 {
            // list elements are unnamed: compound payload + end marker
            list.extend(long_tag("x", 1));
            list.push(TAG_END);
        }
        let bytes = root(&[list]);

        let tree = parse(&bytes).unwrap();
        assert_eq!(tree.get_path(&["items"]).unwrap().as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let mut bytes = root(&[long_tag("value", 42)]);
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(parse(&bytes), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_corrupt_length_prefix_rejected() {
        let mut arr = named(TAG_BYTE_ARRAY, "blob");
        arr.extend(i32::MAX.to_be_bytes());
        let bytes = root(&[arr]);
        assert!(matches!(parse(&bytes), Err(DecodeError::Malformed(_))));
    }
}
