//! Compact binary rule-set format
//!
//! Layout:
//!
//! ```text
//! magic    3 bytes   "CRS"
//! version  u8
//! body     zlib stream
//!   rule count                       uvarint
//!   per rule:
//!     kind                           u8 (0 = default rule)
//!     per non-empty category:
//!       item tag                     u8
//!       value count                  uvarint
//!       per value: byte length       uvarint, then UTF-8 bytes
//!     final tag                      u8 (0xFF)
//!     invert                         u8 (0 or 1)
//! ```
//!
//! Categories are written in [`RuleCategory::ALL`] order.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::generator::{check_version, EncodeError, RuleSetWriter};
use crate::models::{DefaultHeadlessRule, HeadlessRule, PlainRuleSet, RuleCategory, RuleSet};

pub const MAGIC: [u8; 3] = *b"CRS";

const RULE_KIND_DEFAULT: u8 = 0;
const ITEM_FINAL: u8 = 0xFF;

fn item_tag(category: RuleCategory) -> u8 {
    match category {
        RuleCategory::Domain => 1,
        RuleCategory::DomainSuffix => 2,
        RuleCategory::PackageName => 3,
        RuleCategory::ProcessName => 4,
        RuleCategory::IpCidr => 5,
    }
}

fn category_for_tag(tag: u8) -> Option<RuleCategory> {
    RuleCategory::ALL
        .into_iter()
        .find(|category| item_tag(*category) == tag)
}

pub struct BinaryWriter;

impl RuleSetWriter for BinaryWriter {
    fn extension(&self) -> &'static str {
        "crs"
    }

    fn write(
        &self,
        writer: &mut dyn Write,
        rule_set: &PlainRuleSet,
        version: u8,
    ) -> Result<(), EncodeError> {
        check_version(version)?;
        writer.write_all(&MAGIC)?;
        writer.write_all(&[version])?;

        let mut encoder = ZlibEncoder::new(writer, Compression::best());
        write_uvarint(&mut encoder, rule_set.rules.len() as u64)?;
        for rule in &rule_set.rules {
            write_rule(&mut encoder, rule)?;
        }
        encoder.finish()?;
        Ok(())
    }
}

fn write_rule<W: Write>(writer: &mut W, rule: &HeadlessRule) -> io::Result<()> {
    match rule {
        HeadlessRule::Default(rule) => {
            writer.write_all(&[RULE_KIND_DEFAULT])?;
            for category in rule.items.categories() {
                writer.write_all(&[item_tag(category)])?;
                write_strings(writer, rule.items.values(category))?;
            }
            writer.write_all(&[ITEM_FINAL, u8::from(rule.invert)])
        }
    }
}

fn write_strings<W: Write>(writer: &mut W, values: &[String]) -> io::Result<()> {
    write_uvarint(writer, values.len() as u64)?;
    for value in values {
        write_uvarint(writer, value.len() as u64)?;
        writer.write_all(value.as_bytes())?;
    }
    Ok(())
}

fn write_uvarint<W: Write>(writer: &mut W, mut value: u64) -> io::Result<()> {
    let mut buf = [0u8; 10];
    let mut len = 0;
    while value >= 0x80 {
        buf[len] = (value as u8) | 0x80;
        value >>= 7;
        len += 1;
    }
    buf[len] = value as u8;
    writer.write_all(&buf[..=len])
}

/// Decode a binary rule set, returning its format version and rules.
pub fn read_rule_set<R: Read>(mut reader: R) -> Result<(u8, PlainRuleSet), EncodeError> {
    let mut magic = [0u8; 3];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(EncodeError::Corrupt("bad magic bytes".to_string()));
    }
    let version = read_u8(&mut reader)?;
    check_version(version)?;

    let mut body = ZlibDecoder::new(reader);
    let count = read_uvarint(&mut body)?;
    let mut rules = Vec::new();
    for _ in 0..count {
        rules.push(read_rule(&mut body)?);
    }
    Ok((version, PlainRuleSet { rules }))
}

fn read_rule<R: Read>(reader: &mut R) -> Result<HeadlessRule, EncodeError> {
    let kind = read_u8(reader)?;
    if kind != RULE_KIND_DEFAULT {
        return Err(EncodeError::Corrupt(format!("unknown rule kind {}", kind)));
    }

    let mut items = RuleSet::new();
    loop {
        let tag = read_u8(reader)?;
        if tag == ITEM_FINAL {
            break;
        }
        let category = category_for_tag(tag)
            .ok_or_else(|| EncodeError::Corrupt(format!("unknown item tag {}", tag)))?;
        let count = read_uvarint(reader)?;
        for _ in 0..count {
            items.push(category, read_string(reader)?);
        }
    }

    let invert = match read_u8(reader)? {
        0 => false,
        1 => true,
        other => {
            return Err(EncodeError::Corrupt(format!("invalid invert flag {}", other)));
        }
    };
    Ok(HeadlessRule::Default(DefaultHeadlessRule { items, invert }))
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, EncodeError> {
    let len = read_uvarint(reader)?;
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(EncodeError::Corrupt("truncated string".to_string()));
    }
    String::from_utf8(buf).map_err(|e| EncodeError::Corrupt(e.to_string()))
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, EncodeError> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

fn read_uvarint<R: Read>(reader: &mut R) -> Result<u64, EncodeError> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        let byte = read_u8(reader)?;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(EncodeError::Corrupt("varint overflows u64".to_string()))
}
