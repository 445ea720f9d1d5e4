//! Cell formatting for the hex grid and the inspector panel.
//!
//! Nothing here computes values. Bytes become hex digits, offsets become
//! fixed-width addresses, and the backend's pre-decoded strings are selected
//! by byte order and character mode, then sanitised for the terminal.

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::backend::{DataInPosition, TextDataInPosition};
use crate::geometry::COLUMNS;

/// Placeholder for characters that cannot be shown in a terminal cell.
pub const PLACEHOLDER: char = '.';

/// Byte order used to pick decoded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl Endian {
    /// The other byte order.
    pub fn toggle(self) -> Self {
        match self {
            Endian::Little => Endian::Big,
            Endian::Big => Endian::Little,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endian::Little => "LE",
            Endian::Big => "BE",
        })
    }
}

/// Character set used by the text grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterMode {
    /// One byte per character, 7-bit only.
    #[default]
    Ascii,
    /// UTF-8.
    Utf8,
    /// UTF-16 code units.
    Utf16,
    /// UTF-32 code units.
    Utf32,
}

impl CharacterMode {
    /// Display name, e.g. `UTF-16`.
    pub fn label(self) -> &'static str {
        match self {
            CharacterMode::Ascii => "ASCII",
            CharacterMode::Utf8 => "UTF-8",
            CharacterMode::Utf16 => "UTF-16",
            CharacterMode::Utf32 => "UTF-32",
        }
    }

    /// The next mode, wrapping from UTF-32 back to ASCII.
    pub fn next(self) -> Self {
        match self {
            CharacterMode::Ascii => CharacterMode::Utf8,
            CharacterMode::Utf8 => CharacterMode::Utf16,
            CharacterMode::Utf16 => CharacterMode::Utf32,
            CharacterMode::Utf32 => CharacterMode::Ascii,
        }
    }
}

impl fmt::Display for CharacterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Formats a byte as two hex digits.
pub fn hex_byte(byte: u8, upper: bool) -> String {
    if upper {
        format!("{byte:02X}")
    } else {
        format!("{byte:02x}")
    }
}

/// Formats an offset as at least eight hex digits.
pub fn hex_offset(offset: u64, upper: bool) -> String {
    if upper {
        format!("{offset:08X}")
    } else {
        format!("{offset:08x}")
    }
}

/// The column header line above the hex grid, aligned with [`hex_offset`].
pub fn column_header(upper: bool) -> String {
    let mut header = " ".repeat(8);
    for column in 0..COLUMNS {
        header.push(' ');
        header.push_str(&hex_byte(column as u8, upper));
    }
    header
}

/// Replaces control characters with [`PLACEHOLDER`].
pub fn printable(c: char) -> char {
    if c.is_control() {
        PLACEHOLDER
    } else {
        c
    }
}

/// Keeps `c` only if it occupies exactly one terminal column, so every text
/// cell lines up under its hex cell. Wide and zero-width characters become
/// [`PLACEHOLDER`].
pub fn single_width(c: char) -> char {
    match UnicodeWidthChar::width(c) {
        Some(1) => c,
        _ => PLACEHOLDER,
    }
}

/// Strips escape sequences and control characters from backend text.
pub fn sanitize(text: &str) -> String {
    strip_ansi_escapes::strip_str(text)
        .chars()
        .map(printable)
        .collect()
}

/// Pads `text` with spaces to `width` terminal columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    if w >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - w))
    }
}

/// One labelled line of the inspector table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorRow {
    /// Type name, e.g. `i32` or `utf8`.
    pub label: &'static str,
    /// Sanitised value.
    pub value: String,
}

fn first_char(s: &str) -> String {
    sanitize(s).chars().next().map(String::from).unwrap_or_default()
}

/// The 12 numeric rows followed by the 4 character rows for one byte order.
pub fn inspector_rows(data: &DataInPosition, endian: Endian) -> Vec<InspectorRow> {
    let numeric: [(&'static str, &String); 12] = match endian {
        Endian::Little => [
            ("u8", &data.value_le_u8),
            ("i8", &data.value_le_i8),
            ("u16", &data.value_le_u16),
            ("i16", &data.value_le_i16),
            ("u32", &data.value_le_u32),
            ("i32", &data.value_le_i32),
            ("u64", &data.value_le_u64),
            ("i64", &data.value_le_i64),
            ("u128", &data.value_le_u128),
            ("i128", &data.value_le_i128),
            ("f32", &data.value_le_f32),
            ("f64", &data.value_le_f64),
        ],
        Endian::Big => [
            ("u8", &data.value_be_u8),
            ("i8", &data.value_be_i8),
            ("u16", &data.value_be_u16),
            ("i16", &data.value_be_i16),
            ("u32", &data.value_be_u32),
            ("i32", &data.value_be_i32),
            ("u64", &data.value_be_u64),
            ("i64", &data.value_be_i64),
            ("u128", &data.value_be_u128),
            ("i128", &data.value_be_i128),
            ("f32", &data.value_be_f32),
            ("f64", &data.value_be_f64),
        ],
    };
    let chars: [(&'static str, &String); 4] = match endian {
        Endian::Little => [
            ("ascii", &data.char_le_ascii),
            ("utf8", &data.char_le_utf8),
            ("utf16", &data.char_le_utf16),
            ("utf32", &data.char_le_utf32),
        ],
        Endian::Big => [
            ("ascii", &data.char_be_ascii),
            ("utf8", &data.char_be_utf8),
            ("utf16", &data.char_be_utf16),
            ("utf32", &data.char_be_utf32),
        ],
    };

    numeric
        .into_iter()
        .map(|(label, value)| InspectorRow {
            label,
            value: sanitize(value),
        })
        .chain(chars.into_iter().map(|(label, value)| InspectorRow {
            label,
            value: first_char(value),
        }))
        .collect()
}

fn text_field(text: &TextDataInPosition, endian: Endian, mode: CharacterMode) -> &str {
    match (mode, endian) {
        (CharacterMode::Ascii, _) => &text.text_ascii,
        (CharacterMode::Utf8, Endian::Little) => &text.text_le_utf8,
        (CharacterMode::Utf8, Endian::Big) => &text.text_be_utf8,
        (CharacterMode::Utf16, Endian::Little) => &text.text_le_utf16,
        (CharacterMode::Utf16, Endian::Big) => &text.text_be_utf16,
        (CharacterMode::Utf32, Endian::Little) => &text.text_le_utf32,
        (CharacterMode::Utf32, Endian::Big) => &text.text_be_utf32,
    }
}

/// The character shown in text cell `index`, or `None` past the decoded text.
pub fn text_cell(
    text: &TextDataInPosition,
    index: usize,
    endian: Endian,
    mode: CharacterMode,
) -> Option<char> {
    text_field(text, endian, mode)
        .chars()
        .nth(index)
        .map(printable)
}
