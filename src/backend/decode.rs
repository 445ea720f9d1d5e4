//! Reference byte decoders.
//!
//! These produce the payloads a backend hands to the hex view. Numeric
//! interpretations cover the 16 bytes starting at an offset, zero padded
//! past the end of the data. Text decodes yield exactly one character per
//! byte position so the text grid lines up with the hex grid; positions that
//! do not start a decodable character become `.`.

use super::{DataInPosition, TextDataInPosition};

/// Bytes considered by a position decode.
pub const POSITION_WIDTH: usize = 16;

const UNDECODABLE: char = '.';

fn window(data: &[u8]) -> [u8; POSITION_WIDTH] {
    let mut buf = [0u8; POSITION_WIDTH];
    let n = data.len().min(POSITION_WIDTH);
    buf[..n].copy_from_slice(&data[..n]);
    buf
}

fn array<const N: usize>(buf: &[u8; POSITION_WIDTH]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[..N]);
    out
}

fn leading_utf8(bytes: &[u8]) -> Option<char> {
    let valid = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            // from_utf8 cannot fail on the valid prefix
            std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default()
        }
    };
    valid.chars().next()
}

fn utf16_char(unit: u16) -> Option<char> {
    char::from_u32(u32::from(unit))
}

fn opt_string(c: Option<char>) -> String {
    c.map(String::from).unwrap_or_default()
}

/// Decodes the bytes at one position in every supported format.
pub fn decode_position(data: &[u8]) -> DataInPosition {
    let buf = window(data);
    let b2: [u8; 2] = array(&buf);
    let b4: [u8; 4] = array(&buf);
    let b8: [u8; 8] = array(&buf);
    let b16: [u8; 16] = array(&buf);
    let swapped = [buf[1], buf[0]];

    DataInPosition {
        value_le_u8: buf[0].to_string(),
        value_le_i8: (buf[0] as i8).to_string(),
        value_le_u16: u16::from_le_bytes(b2).to_string(),
        value_le_i16: i16::from_le_bytes(b2).to_string(),
        value_le_u32: u32::from_le_bytes(b4).to_string(),
        value_le_i32: i32::from_le_bytes(b4).to_string(),
        value_le_u64: u64::from_le_bytes(b8).to_string(),
        value_le_i64: i64::from_le_bytes(b8).to_string(),
        value_le_u128: u128::from_le_bytes(b16).to_string(),
        value_le_i128: i128::from_le_bytes(b16).to_string(),
        value_le_f32: format!("{:e}", f32::from_le_bytes(b4)),
        value_le_f64: format!("{:e}", f64::from_le_bytes(b8)),
        char_le_ascii: char::from(buf[0]).to_string(),
        char_le_utf8: opt_string(leading_utf8(&b4)),
        char_le_utf16: opt_string(utf16_char(u16::from_le_bytes(b2))),
        char_le_utf32: opt_string(char::from_u32(u32::from_le_bytes(b4))),
        value_be_u8: buf[0].to_string(),
        value_be_i8: (buf[0] as i8).to_string(),
        value_be_u16: u16::from_be_bytes(b2).to_string(),
        value_be_i16: i16::from_be_bytes(b2).to_string(),
        value_be_u32: u32::from_be_bytes(b4).to_string(),
        value_be_i32: i32::from_be_bytes(b4).to_string(),
        value_be_u64: u64::from_be_bytes(b8).to_string(),
        value_be_i64: i64::from_be_bytes(b8).to_string(),
        value_be_u128: u128::from_be_bytes(b16).to_string(),
        value_be_i128: i128::from_be_bytes(b16).to_string(),
        value_be_f32: format!("{:e}", f32::from_be_bytes(b4)),
        value_be_f64: format!("{:e}", f64::from_be_bytes(b8)),
        char_be_ascii: char::from(buf[0]).to_string(),
        char_be_utf8: opt_string(leading_utf8(&swapped)),
        char_be_utf16: opt_string(utf16_char(u16::from_be_bytes(b2))),
        char_be_utf32: opt_string(char::from_u32(u32::from_be_bytes(b4))),
    }
}

fn ascii_at(bytes: &[u8], i: usize) -> char {
    if bytes[i].is_ascii() {
        char::from(bytes[i])
    } else {
        UNDECODABLE
    }
}

fn utf8_at(bytes: &[u8], i: usize, big_endian: bool) -> char {
    if bytes[i].is_ascii() {
        return char::from(bytes[i]);
    }
    let decoded = if big_endian {
        bytes
            .get(i + 1)
            .and_then(|next| leading_utf8(&[*next, bytes[i]]))
    } else {
        let end = (i + 4).min(bytes.len());
        leading_utf8(&bytes[i..end])
    };
    decoded.unwrap_or(UNDECODABLE)
}

fn utf16_at(bytes: &[u8], i: usize, big_endian: bool) -> char {
    let Some(pair) = bytes.get(i..i + 2) else {
        return UNDECODABLE;
    };
    let pair = [pair[0], pair[1]];
    let unit = if big_endian {
        u16::from_be_bytes(pair)
    } else {
        u16::from_le_bytes(pair)
    };
    utf16_char(unit).unwrap_or(UNDECODABLE)
}

fn utf32_at(bytes: &[u8], i: usize, big_endian: bool) -> char {
    let Some(quad) = bytes.get(i..i + 4) else {
        return UNDECODABLE;
    };
    let quad = [quad[0], quad[1], quad[2], quad[3]];
    let value = if big_endian {
        u32::from_be_bytes(quad)
    } else {
        u32::from_le_bytes(quad)
    };
    char::from_u32(value).unwrap_or(UNDECODABLE)
}

fn per_position(bytes: &[u8], f: impl Fn(&[u8], usize) -> char) -> String {
    (0..bytes.len()).map(|i| f(bytes, i)).collect()
}

/// Decodes a chunk as text in every supported encoding.
pub fn decode_text(bytes: &[u8]) -> TextDataInPosition {
    TextDataInPosition {
        text_ascii: per_position(bytes, ascii_at),
        text_le_utf8: per_position(bytes, |b, i| utf8_at(b, i, false)),
        text_le_utf16: per_position(bytes, |b, i| utf16_at(b, i, false)),
        text_le_utf32: per_position(bytes, |b, i| utf32_at(b, i, false)),
        text_be_utf8: per_position(bytes, |b, i| utf8_at(b, i, true)),
        text_be_utf16: per_position(bytes, |b, i| utf16_at(b, i, true)),
        text_be_utf32: per_position(bytes, |b, i| utf32_at(b, i, true)),
    }
}
