// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Blob persistence: a self-describing binary encoding for lists.
//!
//! The layout is a 12-byte fixed header, the node stream, and an 8-byte
//! footer: a CRC32 over everything before it plus a magic number ("YLTM",
//! the header magic reversed). If the footer is wrong, something got
//! corrupted or truncated. Don't trust the data.
//!
//! Values encode recursively: one tag byte (kind code in the low bits,
//! shared flag in the high bit), then a fixed-width little-endian payload
//! for scalars or a varint-length-prefixed payload for everything else.
//! Decoding validates every tag byte, every declared length, the nesting
//! depth, and the checksum before handing anything back - the input is
//! assumed hostile until proven otherwise.
//!
//! Two things deliberately do not round-trip:
//!
//! - **Aliases.** A shared slot's tag survives, but the decoded slot aliases
//!   a fresh allocation holding the decoded copy. An alias cannot refer
//!   across serialization.
//! - **Non-null opaque pointers.** The library has no idea what's behind
//!   them, so encoding one is an error rather than a lie. Null encodes fine.

use std::io;
use std::sync::Arc;

use crc32fast::Hasher as Crc32Hasher;

use crate::contracts::validate_list;
use crate::list::{List, Node};
use crate::types::{Kind, Ownership, Tag};
use crate::value::{Bytes, Opaque, Slot, Value};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "MTLY" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x4D, 0x54, 0x4C, 0x59];

/// Footer magic: "YLTM" (reversed, marks valid blob end)
pub const FOOTER_MAGIC: [u8; 4] = [0x59, 0x4C, 0x54, 0x4D];

/// Current format version
pub const VERSION: u8 = 1;

/// Header size: 4 (magic) + 1 (version) + 1 (key tag) + 2 (reserved) +
/// 4 (node count)
pub const HEADER_SIZE: usize = 12;

/// Footer size: 4 (CRC32) + 4 (magic)
pub const FOOTER_SIZE: usize = 8;

/// Tag byte: shared flag lives in the high bit, kind code in the rest.
const SHARED_FLAG: u8 = 0x80;

/// Node flag: the node carries a key.
const FLAG_HAS_KEY: u8 = 0x01;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum blob size: 100 MB (prevents huge allocations)
pub const MAX_BLOB_SIZE: usize = 100 * 1024 * 1024;

/// Maximum node count per container
pub const MAX_NODE_COUNT: u64 = 10_000_000;

/// Maximum string/buffer payload length
pub const MAX_PAYLOAD_LEN: u64 = 100 * 1024 * 1024;

/// Maximum container nesting depth
pub const MAX_DEPTH: usize = 64;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= u64::from(byte & 0x7F) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

// ============================================================================
// TAG BYTES
// ============================================================================

fn tag_byte(tag: Tag) -> u8 {
    let mut byte = tag.kind.code();
    if tag.is_shared() {
        byte |= SHARED_FLAG;
    }
    byte
}

fn parse_tag(byte: u8) -> io::Result<Tag> {
    let ownership = if byte & SHARED_FLAG != 0 {
        Ownership::Shared
    } else {
        Ownership::Owned
    };
    let kind = Kind::from_code(byte & !SHARED_FLAG).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Unknown kind code {:#x}", byte & !SHARED_FLAG),
        )
    })?;
    Ok(Tag { kind, ownership })
}

// ============================================================================
// READER
// ============================================================================

/// Bounds-checked cursor over the blob body.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, count: usize) -> io::Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Blob ends mid-value",
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn byte(&mut self) -> io::Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn varint(&mut self) -> io::Result<u64> {
        let (value, consumed) = decode_varint(&self.bytes[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Varint that names a length; capped against the declared limit.
    fn length(&mut self, max: u64) -> io::Result<usize> {
        let raw = self.varint()?;
        if raw > max {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Declared length {} exceeds limit {}", raw, max),
            ));
        }
        Ok(raw as usize)
    }
}

// ============================================================================
// ENCODING
// ============================================================================

fn check_depth(depth: usize) -> io::Result<()> {
    if depth > MAX_DEPTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Container nesting exceeds {} levels", MAX_DEPTH),
        ));
    }
    Ok(())
}

fn encode_node(node: &Node, buf: &mut Vec<u8>, depth: usize) -> io::Result<()> {
    let mut flags = 0u8;
    if node.key().is_some() {
        flags |= FLAG_HAS_KEY;
    }
    buf.push(flags);
    if let Some(key) = node.key() {
        encode_value(key, buf, depth)?;
    }
    encode_value(node.value(), buf, depth)
}

/// Nested list encoding: key tag byte, node count, nodes.
fn encode_list_body(list: &List, buf: &mut Vec<u8>, depth: usize) -> io::Result<()> {
    check_depth(depth)?;
    buf.push(tag_byte(list.key_tag()));
    encode_varint(list.len() as u64, buf);
    for node in list.iter() {
        encode_node(node, buf, depth)?;
    }
    Ok(())
}

fn encode_entries<'a, I>(key_tag: Tag, entries: I, count: usize, buf: &mut Vec<u8>, depth: usize) -> io::Result<()>
where
    I: Iterator<Item = (&'a Value, &'a Value)>,
{
    check_depth(depth)?;
    buf.push(tag_byte(key_tag));
    encode_varint(count as u64, buf);
    for (key, value) in entries {
        encode_value(key, buf, depth)?;
        encode_value(value, buf, depth)?;
    }
    Ok(())
}

fn encode_value(value: &Value, buf: &mut Vec<u8>, depth: usize) -> io::Result<()> {
    check_depth(depth)?;
    buf.push(tag_byte(value.tag()));
    match value {
        Value::Bool(v) => buf.push(u8::from(*v.get())),
        Value::I8(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::U8(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::I16(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::U16(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::I32(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::U32(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::I64(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::U64(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::I128(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::U128(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::F32(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::F64(v) | Value::LongDouble(v) => buf.extend_from_slice(&v.get().to_le_bytes()),
        Value::Str(v) => {
            let text = v.get().as_bytes();
            encode_varint(text.len() as u64, buf);
            buf.extend_from_slice(text);
        }
        Value::Bytes(v) => {
            let data = v.get().as_slice();
            encode_varint(data.len() as u64, buf);
            buf.extend_from_slice(data);
        }
        Value::List(v) => encode_list_body(v.get(), buf, depth + 1)?,
        Value::Queue(v) => encode_list_body(v.get().inner(), buf, depth + 1)?,
        Value::Stack(v) => encode_list_body(v.get().inner(), buf, depth + 1)?,
        Value::Tree(v) => {
            let tree = v.get();
            encode_entries(tree.key_tag(), tree.iter(), tree.len(), buf, depth + 1)?;
        }
        Value::Map(v) => {
            let map = v.get();
            encode_entries(map.key_tag(), map.iter(), map.len(), buf, depth + 1)?;
        }
        Value::Array(v) => {
            check_depth(depth + 1)?;
            let array = v.get();
            encode_varint(array.len() as u64, buf);
            for item in array.iter() {
                encode_value(item, buf, depth + 1)?;
            }
        }
        Value::Pointer(v) => {
            if !v.get().is_null() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "Non-null opaque pointers cannot be persisted",
                ));
            }
            buf.push(0);
        }
    }
    Ok(())
}

/// Encode a list into a self-describing, checksummed blob.
pub fn encode_list(list: &List) -> io::Result<Vec<u8>> {
    if list.len() as u64 > MAX_NODE_COUNT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "List too long for blob format",
        ));
    }
    let count = list.len() as u32;

    let mut buf = Vec::new();
    buf.extend_from_slice(&MAGIC);
    buf.push(VERSION);
    buf.push(tag_byte(list.key_tag()));
    buf.extend_from_slice(&[0u8; 2]); // reserved
    buf.extend_from_slice(&count.to_le_bytes());
    for node in list.iter() {
        encode_node(node, &mut buf, 0)?;
    }

    let mut hasher = Crc32Hasher::new();
    hasher.update(&buf);
    let crc32 = hasher.finalize();
    buf.extend_from_slice(&crc32.to_le_bytes());
    buf.extend_from_slice(&FOOTER_MAGIC);
    Ok(buf)
}

// ============================================================================
// DECODING
// ============================================================================

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

/// Wrap a decoded payload in a slot matching its declared ownership.
///
/// Shared slots alias a fresh allocation holding the decoded copy.
fn slot<T>(ownership: Ownership, payload: T) -> Slot<T> {
    match ownership {
        Ownership::Owned => Slot::Owned(payload),
        Ownership::Shared => Slot::Shared(Arc::new(payload)),
    }
}

fn decode_node(reader: &mut Reader<'_>, list: &mut List, depth: usize) -> io::Result<()> {
    let flags = reader.byte()?;
    if flags & !FLAG_HAS_KEY != 0 {
        return Err(invalid(format!("Unknown node flags {:#x}", flags)));
    }
    let key = if flags & FLAG_HAS_KEY != 0 {
        Some(decode_value(reader, depth)?)
    } else {
        None
    };
    let value = decode_value(reader, depth)?;
    match key {
        Some(key) => {
            if key.tag() != list.key_tag() {
                return Err(invalid(format!(
                    "Node key tagged {} in a container keyed by {}",
                    key.tag(),
                    list.key_tag()
                )));
            }
            list.add_back(key, value)
                .map_err(|error| invalid(error.to_string()))?;
        }
        None => {
            list.push_back_value(value);
        }
    }
    Ok(())
}

/// Nested list decoding: key tag byte, node count, nodes.
fn decode_list_body(reader: &mut Reader<'_>, depth: usize) -> io::Result<List> {
    check_depth(depth)?;
    let key_tag = parse_tag(reader.byte()?)?;
    let count = reader.length(MAX_NODE_COUNT)?;
    let mut list = List::new(key_tag);
    for _ in 0..count {
        decode_node(reader, &mut list, depth)?;
    }
    Ok(list)
}

fn decode_entries(
    reader: &mut Reader<'_>,
    depth: usize,
) -> io::Result<(Tag, Vec<(Value, Value)>)> {
    check_depth(depth)?;
    let key_tag = parse_tag(reader.byte()?)?;
    let count = reader.length(MAX_NODE_COUNT)?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let key = decode_value(reader, depth)?;
        if key.tag() != key_tag {
            return Err(invalid(format!(
                "Entry key tagged {} in a container keyed by {}",
                key.tag(),
                key_tag
            )));
        }
        let value = decode_value(reader, depth)?;
        entries.push((key, value));
    }
    Ok((key_tag, entries))
}

fn decode_value(reader: &mut Reader<'_>, depth: usize) -> io::Result<Value> {
    check_depth(depth)?;
    let tag = parse_tag(reader.byte()?)?;
    let ownership = tag.ownership;
    Ok(match tag.kind {
        Kind::Bool => {
            let byte = reader.byte()?;
            if byte > 1 {
                return Err(invalid(format!("Invalid boolean byte {:#x}", byte)));
            }
            Value::Bool(slot(ownership, byte == 1))
        }
        Kind::I8 => Value::I8(slot(ownership, i8::from_le_bytes(reader.array()?))),
        Kind::U8 => Value::U8(slot(ownership, u8::from_le_bytes(reader.array()?))),
        Kind::I16 => Value::I16(slot(ownership, i16::from_le_bytes(reader.array()?))),
        Kind::U16 => Value::U16(slot(ownership, u16::from_le_bytes(reader.array()?))),
        Kind::I32 => Value::I32(slot(ownership, i32::from_le_bytes(reader.array()?))),
        Kind::U32 => Value::U32(slot(ownership, u32::from_le_bytes(reader.array()?))),
        Kind::I64 => Value::I64(slot(ownership, i64::from_le_bytes(reader.array()?))),
        Kind::U64 => Value::U64(slot(ownership, u64::from_le_bytes(reader.array()?))),
        Kind::I128 => Value::I128(slot(ownership, i128::from_le_bytes(reader.array()?))),
        Kind::U128 => Value::U128(slot(ownership, u128::from_le_bytes(reader.array()?))),
        Kind::F32 => Value::F32(slot(ownership, f32::from_le_bytes(reader.array()?))),
        Kind::F64 => Value::F64(slot(ownership, f64::from_le_bytes(reader.array()?))),
        Kind::LongDouble => {
            Value::LongDouble(slot(ownership, f64::from_le_bytes(reader.array()?)))
        }
        Kind::Str => {
            let length = reader.length(MAX_PAYLOAD_LEN)?;
            let text = std::str::from_utf8(reader.take(length)?)
                .map_err(|_| invalid("String payload is not valid UTF-8"))?;
            Value::Str(slot(ownership, text.to_owned()))
        }
        Kind::Bytes => {
            let length = reader.length(MAX_PAYLOAD_LEN)?;
            Value::Bytes(slot(ownership, Bytes::from_slice(reader.take(length)?)))
        }
        Kind::List => Value::List(slot(ownership, decode_list_body(reader, depth + 1)?)),
        Kind::Queue => {
            let inner = decode_list_body(reader, depth + 1)?;
            Value::Queue(slot(ownership, crate::Queue::from_list(inner)))
        }
        Kind::Stack => {
            let inner = decode_list_body(reader, depth + 1)?;
            Value::Stack(slot(ownership, crate::Stack::from_list(inner)))
        }
        Kind::Tree => {
            let (key_tag, entries) = decode_entries(reader, depth + 1)?;
            let mut tree = crate::Tree::new(key_tag);
            for (key, value) in entries {
                tree.insert(key, value)
                    .map_err(|error| invalid(error.to_string()))?;
            }
            Value::Tree(slot(ownership, tree))
        }
        Kind::Map => {
            let (key_tag, entries) = decode_entries(reader, depth + 1)?;
            let mut map = crate::Map::new(key_tag);
            for (key, value) in entries {
                map.insert(key, value)
                    .map_err(|error| invalid(error.to_string()))?;
            }
            Value::Map(slot(ownership, map))
        }
        Kind::Array => {
            check_depth(depth + 1)?;
            let count = reader.length(MAX_NODE_COUNT)?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(decode_value(reader, depth + 1)?);
            }
            Value::Array(slot(ownership, crate::Array::from(items)))
        }
        Kind::Pointer => {
            let byte = reader.byte()?;
            if byte != 0 {
                return Err(invalid("Blob claims a non-null opaque pointer"));
            }
            Value::Pointer(slot(ownership, Opaque::null()))
        }
    })
}

/// Decode a blob produced by [`encode_list`], validating everything.
pub fn decode_list(bytes: &[u8]) -> io::Result<List> {
    if bytes.len() > MAX_BLOB_SIZE {
        return Err(invalid(format!(
            "Blob of {} bytes exceeds the {} byte limit",
            bytes.len(),
            MAX_BLOB_SIZE
        )));
    }
    if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Blob too short for header and footer",
        ));
    }

    // Footer first: no point parsing corrupted data.
    let footer_start = bytes.len() - FOOTER_SIZE;
    if bytes[footer_start + 4..] != FOOTER_MAGIC {
        return Err(invalid("Invalid footer magic"));
    }
    let stored_crc = u32::from_le_bytes([
        bytes[footer_start],
        bytes[footer_start + 1],
        bytes[footer_start + 2],
        bytes[footer_start + 3],
    ]);
    let mut hasher = Crc32Hasher::new();
    hasher.update(&bytes[..footer_start]);
    let computed_crc = hasher.finalize();
    if stored_crc != computed_crc {
        return Err(invalid(format!(
            "Checksum mismatch: stored {:#010x}, computed {:#010x}",
            stored_crc, computed_crc
        )));
    }

    let mut reader = Reader::new(&bytes[..footer_start]);
    let magic = reader.array::<4>()?;
    if magic != MAGIC {
        return Err(invalid(format!(
            "Invalid magic: expected MTLY, got {:?}",
            magic
        )));
    }
    let version = reader.byte()?;
    if version != VERSION {
        return Err(invalid(format!(
            "Unsupported format version {} (current is {})",
            version, VERSION
        )));
    }
    let key_tag = parse_tag(reader.byte()?)?;
    reader.take(2)?; // reserved
    let count = u32::from_le_bytes(reader.array()?);
    if u64::from(count) > MAX_NODE_COUNT {
        return Err(invalid(format!("Node count {} exceeds limit", count)));
    }

    let mut list = List::new(key_tag);
    for _ in 0..count {
        decode_node(&mut reader, &mut list, 0)?;
    }
    if reader.remaining() != 0 {
        return Err(invalid(format!(
            "{} bytes of trailing garbage before footer",
            reader.remaining()
        )));
    }

    validate_list(&list).map_err(|error| invalid(error.to_string()))?;
    Ok(list)
}

impl List {
    /// Serialize into a self-describing, checksummed blob.
    ///
    /// Fails only for lists that cannot be represented: non-null opaque
    /// pointer payloads, or nesting beyond [`MAX_DEPTH`].
    pub fn to_blob(&self) -> io::Result<Vec<u8>> {
        encode_list(self)
    }

    /// Reconstruct a list from blob bytes.
    ///
    /// The input is treated as untrusted: magic, version, tags, lengths,
    /// depth, and checksum are all validated, and the rebuilt list is
    /// structurally re-checked before it is returned.
    pub fn from_blob(bytes: &[u8]) -> io::Result<List> {
        decode_list(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rich_list;

    #[test]
    fn varint_round_trips() {
        for value in [0u64, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX] {
            let mut buf = Vec::new();
            encode_varint(value, &mut buf);
            let (decoded, consumed) = decode_varint(&buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, buf.len());
        }
    }

    #[test]
    fn varint_rejects_overlong_input() {
        let overlong = [0xFFu8; 11];
        assert!(decode_varint(&overlong).is_err());
        assert!(decode_varint(&[0x80]).is_err());
        assert!(decode_varint(&[]).is_err());
    }

    #[test]
    fn tag_bytes_round_trip() {
        for code in 0..=22u8 {
            let kind = Kind::from_code(code).unwrap();
            for tag in [Tag::owned(kind), Tag::shared(kind)] {
                assert_eq!(parse_tag(tag_byte(tag)).unwrap(), tag);
            }
        }
        assert!(parse_tag(0x7F).is_err());
    }

    #[test]
    fn blob_round_trips_a_rich_list() {
        let list = rich_list();
        let blob = list.to_blob().unwrap();
        let decoded = List::from_blob(&blob).unwrap();
        assert_eq!(decoded, list);
        assert_eq!(decoded.key_tag(), list.key_tag());
    }

    #[test]
    fn blob_preserves_shared_tags_with_fresh_aliases() {
        use std::sync::Arc;

        let mut list = List::new(Tag::shared(Kind::Str));
        let key = Arc::new(String::from("k"));
        let value = Arc::new(7i64);
        list.add_back(Arc::clone(&key), Arc::clone(&value)).unwrap();

        let decoded = List::from_blob(&list.to_blob().unwrap()).unwrap();
        assert_eq!(decoded.key_tag(), Tag::shared(Kind::Str));
        let node = decoded.front().unwrap();
        assert_eq!(node.value().tag(), Tag::shared(Kind::I64));
        // Same data, different allocation: aliases don't cross serialization.
        assert_eq!(node.value().as_i64(), Some(7));
        assert_ne!(
            node.value().alias_addr(),
            Some(Arc::as_ptr(&value) as usize)
        );
    }

    #[test]
    fn corrupted_blobs_are_rejected() {
        let blob = rich_list().to_blob().unwrap();

        // Bad header magic.
        let mut bad_magic = blob.clone();
        bad_magic[0] ^= 0xFF;
        assert!(List::from_blob(&bad_magic).is_err());

        // Flipped content byte breaks the checksum.
        let mut bad_content = blob.clone();
        bad_content[HEADER_SIZE] ^= 0xFF;
        assert!(List::from_blob(&bad_content).is_err());

        // Truncation loses the footer.
        assert!(List::from_blob(&blob[..blob.len() - 1]).is_err());
        assert!(List::from_blob(&blob[..4]).is_err());

        // Bad footer magic.
        let mut bad_footer = blob.clone();
        let end = bad_footer.len() - 1;
        bad_footer[end] ^= 0xFF;
        assert!(List::from_blob(&bad_footer).is_err());

        // The pristine blob still decodes.
        assert!(List::from_blob(&blob).is_ok());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut blob = rich_list().to_blob().unwrap();
        blob[4] = VERSION + 1;
        // Fix the checksum so the version check is what fails.
        let footer_start = blob.len() - FOOTER_SIZE;
        let mut hasher = Crc32Hasher::new();
        hasher.update(&blob[..footer_start]);
        let crc = hasher.finalize().to_le_bytes();
        blob[footer_start..footer_start + 4].copy_from_slice(&crc);

        let error = List::from_blob(&blob).unwrap_err();
        assert!(error.to_string().contains("version"));
    }

    #[test]
    fn non_null_pointer_payloads_do_not_encode() {
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("p", Opaque::new(42u32)).unwrap();
        assert!(list.to_blob().is_err());

        let mut nullable = List::new(Tag::owned(Kind::Str));
        nullable.add_back("p", Value::null()).unwrap();
        let decoded = List::from_blob(&nullable.to_blob().unwrap()).unwrap();
        assert!(decoded.front().unwrap().value().is_null());
    }

    #[test]
    fn nesting_beyond_the_limit_is_rejected() {
        let mut value = Value::from(0i32);
        for _ in 0..(MAX_DEPTH + 2) {
            let mut array = crate::Array::new();
            array.push(value);
            value = Value::from(array);
        }
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("deep", value).unwrap();
        assert!(list.to_blob().is_err());
    }

    #[test]
    fn empty_list_round_trips() {
        let list = List::new(Tag::shared(Kind::Bool));
        let blob = list.to_blob().unwrap();
        assert_eq!(blob.len(), HEADER_SIZE + FOOTER_SIZE);
        let decoded = List::from_blob(&blob).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.key_tag(), Tag::shared(Kind::Bool));
    }
}
