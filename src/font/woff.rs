//! WOFF and WOFF2 wrapping of a compiled TrueType font
//!
//! Both formats keep the sfnt tables as they are and only compress them:
//! per table with zlib for WOFF, as one brotli stream for WOFF2. WOFF2 stores
//! `glyf` and `loca` with the null transform.

use anyhow::{anyhow, Context, Result};
use std::io::Write;

const WOFF_SIGNATURE: u32 = 0x774F_4646;
const WOFF2_SIGNATURE: u32 = 0x774F_4632;

const WOFF_HEADER_SIZE: usize = 44;
const WOFF_TABLE_ENTRY_SIZE: usize = 20;
const SFNT_HEADER_SIZE: usize = 12;
const SFNT_TABLE_ENTRY_SIZE: usize = 16;

/// WOFF2 table flag: the tag follows the flags byte instead of being indexed
const WOFF2_EXPLICIT_TAG: u8 = 0x3F;
/// WOFF2 transform version 3, which leaves `glyf` and `loca` untransformed
const WOFF2_NULL_TRANSFORM: u8 = 0xC0;

const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

struct SfntTable<'a> {
    tag: [u8; 4],
    checksum: u32,
    data: &'a [u8],
}

/// The table directory of a TrueType font
struct Sfnt<'a> {
    flavor: u32,
    tables: Vec<SfntTable<'a>>,
}

impl<'a> Sfnt<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let face = ttf_parser::RawFace::parse(data, 0)
            .map_err(|e| anyhow!("Not a TrueType font: {e}"))?;
        let flavor = data
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u32::from_be_bytes)
            .context("Font is too short")?;

        let mut tables = Vec::new();
        for record in face.table_records {
            let tag = record.tag.to_bytes();
            let start = record.offset as usize;
            let end = start + record.length as usize;
            let data = data.get(start..end).with_context(|| {
                format!("Table '{}' lies outside the font", String::from_utf8_lossy(&tag))
            })?;

            tables.push(SfntTable {
                tag,
                checksum: record.check_sum,
                data,
            });
        }
        tables.sort_by_key(|table| table.tag);

        Ok(Self { flavor, tables })
    }

    /// Size of the font once a WOFF decoder has rebuilt it
    fn total_size(&self) -> usize {
        SFNT_HEADER_SIZE
            + SFNT_TABLE_ENTRY_SIZE * self.tables.len()
            + self.tables.iter().map(|t| padded(t.data.len())).sum::<usize>()
    }
}

/// Wrap a TrueType font as WOFF 1.0
pub fn encode_woff(ttf: &[u8]) -> Result<Vec<u8>> {
    let sfnt = Sfnt::parse(ttf)?;

    let mut directory = Vec::new();
    let mut body = Vec::new();
    let data_start = WOFF_HEADER_SIZE + WOFF_TABLE_ENTRY_SIZE * sfnt.tables.len();

    for table in &sfnt.tables {
        let compressed = zlib(table.data)?;
        // Tables that do not shrink are stored as they are
        let stored = if compressed.len() < table.data.len() {
            compressed.as_slice()
        } else {
            table.data
        };

        directory.extend_from_slice(&table.tag);
        push_u32(&mut directory, size(data_start + body.len())?);
        push_u32(&mut directory, size(stored.len())?);
        push_u32(&mut directory, size(table.data.len())?);
        push_u32(&mut directory, table.checksum);

        body.extend_from_slice(stored);
        pad(&mut body);
    }

    let mut woff = Vec::with_capacity(data_start + body.len());
    push_u32(&mut woff, WOFF_SIGNATURE);
    push_u32(&mut woff, sfnt.flavor);
    push_u32(&mut woff, size(data_start + body.len())?);
    push_u16(&mut woff, table_count(&sfnt)?);
    push_u16(&mut woff, 0);
    push_u32(&mut woff, size(sfnt.total_size())?);
    push_u16(&mut woff, 1);
    push_u16(&mut woff, 0);
    // No metadata or private blocks
    for _ in 0..5 {
        push_u32(&mut woff, 0);
    }

    woff.extend_from_slice(&directory);
    woff.extend_from_slice(&body);
    Ok(woff)
}

/// Wrap a TrueType font as WOFF2
pub fn encode_woff2(ttf: &[u8]) -> Result<Vec<u8>> {
    let sfnt = Sfnt::parse(ttf)?;

    let mut directory = Vec::new();
    let mut stream = Vec::new();
    for table in &sfnt.tables {
        let transform = match &table.tag {
            b"glyf" | b"loca" => WOFF2_NULL_TRANSFORM,
            _ => 0,
        };
        directory.push(transform | WOFF2_EXPLICIT_TAG);
        directory.extend_from_slice(&table.tag);
        push_base128(&mut directory, size(table.data.len())?);
        stream.extend_from_slice(table.data);
    }

    let compressed = brotli_compress(&stream)?;

    let mut woff2 = Vec::new();
    push_u32(&mut woff2, WOFF2_SIGNATURE);
    push_u32(&mut woff2, sfnt.flavor);
    push_u32(&mut woff2, 0); // total length, patched below
    push_u16(&mut woff2, table_count(&sfnt)?);
    push_u16(&mut woff2, 0);
    push_u32(&mut woff2, size(sfnt.total_size())?);
    push_u32(&mut woff2, size(compressed.len())?);
    push_u16(&mut woff2, 1);
    push_u16(&mut woff2, 0);
    // No metadata or private blocks
    for _ in 0..5 {
        push_u32(&mut woff2, 0);
    }

    woff2.extend_from_slice(&directory);
    woff2.extend_from_slice(&compressed);
    pad(&mut woff2);

    let length = size(woff2.len())?.to_be_bytes();
    woff2[8..12].copy_from_slice(&length);
    Ok(woff2)
}

fn zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn brotli_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer =
        brotli::CompressorWriter::new(Vec::new(), 4096, BROTLI_QUALITY, BROTLI_WINDOW);
    writer.write_all(data)?;
    writer.flush()?;
    Ok(writer.into_inner())
}

/// Variable-length big-endian integer, seven bits per byte
fn push_base128(out: &mut Vec<u8>, value: u32) {
    let mut groups = Vec::with_capacity(5);
    let mut rest = value;
    loop {
        groups.push((rest & 0x7F) as u8);
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for (i, group) in groups.iter().enumerate().rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(group | continuation);
    }
}

fn table_count(sfnt: &Sfnt<'_>) -> Result<u16> {
    u16::try_from(sfnt.tables.len()).context("Too many font tables")
}

fn size(value: usize) -> Result<u32> {
    u32::try_from(value).context("Font is too large for a web font container")
}

fn padded(len: usize) -> usize {
    len.div_ceil(4) * 4
}

fn pad(out: &mut Vec<u8>) {
    out.resize(padded(out.len()), 0);
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// A TrueType table directory around the given tables, for tests
#[cfg(test)]
pub(crate) fn sample_sfnt(tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 0);
    push_u16(&mut font, 0);
    push_u16(&mut font, 0);

    let mut offset = SFNT_HEADER_SIZE + SFNT_TABLE_ENTRY_SIZE * tables.len();
    for (tag, data) in tables {
        font.extend_from_slice(*tag);
        push_u32(&mut font, 0x1234_5678);
        push_u32(&mut font, offset as u32);
        push_u32(&mut font, data.len() as u32);
        offset += padded(data.len());
    }
    for (_, data) in tables {
        font.extend_from_slice(data);
        pad(&mut font);
    }
    font
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_be_bytes(bytes[at..at + 2].try_into().unwrap())
    }

    fn sample() -> (Vec<u8>, Vec<u8>) {
        let glyf = vec![7u8; 400];
        let head: &[u8] = &[1, 2, 3];
        let font = sample_sfnt(&[(b"head", head), (b"glyf", glyf.as_slice())]);
        (font, glyf)
    }

    #[test]
    fn test_woff_layout() {
        let (font, glyf) = sample();
        let woff = encode_woff(&font).unwrap();

        assert_eq!(u32_at(&woff, 0), WOFF_SIGNATURE);
        assert_eq!(u32_at(&woff, 4), 0x0001_0000);
        assert_eq!(u32_at(&woff, 8) as usize, woff.len());
        assert_eq!(u16_at(&woff, 12), 2);
        assert_eq!(u32_at(&woff, 16) as usize, 12 + 2 * 16 + 4 + 400);

        // Directory is sorted by tag: glyf, then head
        let glyf_entry = WOFF_HEADER_SIZE;
        assert_eq!(&woff[glyf_entry..glyf_entry + 4], b"glyf");
        let offset = u32_at(&woff, glyf_entry + 4) as usize;
        let compressed_length = u32_at(&woff, glyf_entry + 8) as usize;
        assert_eq!(u32_at(&woff, glyf_entry + 12), 400);
        assert_eq!(u32_at(&woff, glyf_entry + 16), 0x1234_5678);
        assert!(compressed_length < 400);
        assert_eq!(offset % 4, 0);

        let mut decoded = Vec::new();
        flate2::read::ZlibDecoder::new(&woff[offset..offset + compressed_length])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, glyf);

        // Too small to shrink, so stored raw
        let head_entry = WOFF_HEADER_SIZE + WOFF_TABLE_ENTRY_SIZE;
        assert_eq!(&woff[head_entry..head_entry + 4], b"head");
        assert_eq!(u32_at(&woff, head_entry + 8), 3);
        let offset = u32_at(&woff, head_entry + 4) as usize;
        assert_eq!(&woff[offset..offset + 3], &[1, 2, 3]);
    }

    #[test]
    fn test_woff2_layout() {
        let (font, glyf) = sample();
        let woff2 = encode_woff2(&font).unwrap();

        assert_eq!(u32_at(&woff2, 0), WOFF2_SIGNATURE);
        assert_eq!(u32_at(&woff2, 8) as usize, woff2.len());
        assert_eq!(woff2.len() % 4, 0);
        assert_eq!(u16_at(&woff2, 12), 2);

        // glyf: null transform, explicit tag, length 400 (0x83 0x10)
        let directory = &woff2[48..];
        assert_eq!(directory[0], 0xFF);
        assert_eq!(&directory[1..5], b"glyf");
        assert_eq!(&directory[5..7], &[0x83, 0x10]);
        assert_eq!(directory[7], WOFF2_EXPLICIT_TAG);
        assert_eq!(&directory[8..12], b"head");
        assert_eq!(directory[12], 3);

        let compressed_length = u32_at(&woff2, 20) as usize;
        let stream = &directory[13..13 + compressed_length];
        let mut decoded = Vec::new();
        brotli::Decompressor::new(stream, 4096)
            .read_to_end(&mut decoded)
            .unwrap();

        let mut expected = glyf.clone();
        expected.extend_from_slice(&[1, 2, 3]);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_base128() {
        let encode = |value| {
            let mut out = Vec::new();
            push_base128(&mut out, value);
            out
        };
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(63), [0x3F]);
        assert_eq!(encode(128), [0x81, 0x00]);
        assert_eq!(encode(16384), [0x81, 0x80, 0x00]);
    }

    #[test]
    fn test_rejects_non_font() {
        assert!(encode_woff(b"definitely not a font").is_err());
        assert!(encode_woff2(&[]).is_err());
    }
}
