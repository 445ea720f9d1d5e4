//! The asynchronous call boundary to the file backend.
//!
//! File I/O and byte decoding live behind [`Backend`]. The hex view only ever
//! talks to it through commands, so every call is a suspension point that
//! resolves into a message later. Payloads mirror the wire format: page data
//! travels as base64 text and decoded values arrive pre-formatted as strings.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub mod decode;
pub mod memory;

pub use memory::MemoryBackend;

/// Largest number of bytes a single [`Backend::read_file`] call returns.
///
/// A page never spans more than one read, so this also bounds the grid
/// height (see [`MAX_ROWS`](crate::config::MAX_ROWS)).
pub const READ_CHUNK: usize = 1024;

/// Errors reported by a backend call.
///
/// Every variant is recoverable. The viewport and inspector keep their last
/// good state when a call fails and surface the error as a
/// [`NotificationMsg`](crate::notify::NotificationMsg).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No open file has this index.
    #[error("invalid file index {0}")]
    InvalidFileIndex(usize),
    /// The position lies past the end of the file.
    #[error("invalid file position {0}")]
    InvalidPosition(u64),
    /// The underlying read failed.
    #[error("i/o error: {0}")]
    Io(String),
    /// The call never reached the backend, e.g. a broken IPC channel.
    #[error("backend call failed: {0}")]
    Invoke(String),
}

/// Bytes read from a file, base64 encoded.
///
/// Use [`decode_file_data`] to get the raw bytes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReadResult {
    /// Index of the file the bytes came from.
    pub file_index: usize,
    /// Up to [`READ_CHUNK`] bytes in standard base64.
    pub file_data: String,
}

/// An open file as known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFileStateResult {
    /// Name the file was opened with, usually a full path.
    pub file_name: String,
    /// Index used by every other backend call.
    pub file_index: usize,
    /// Length in bytes. Fixed for as long as the file stays open.
    pub file_size: u64,
    /// Last path component of `file_name`, used as the tab label.
    pub file_name_no_path: String,
}

/// Numeric and character interpretations of the bytes at one offset, in both
/// byte orders.
///
/// Values arrive pre-formatted. Integers are plain decimal, floats use
/// exponent notation (`1e0`) and character fields hold the character that
/// starts at the offset, or nothing when the bytes do not decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataInPosition {
    /// `u8`. Identical in both byte orders.
    pub value_le_u8: String,
    /// `i8`. Identical in both byte orders.
    pub value_le_i8: String,
    /// `u16`, little-endian.
    pub value_le_u16: String,
    /// `i16`, little-endian.
    pub value_le_i16: String,
    /// `u32`, little-endian.
    pub value_le_u32: String,
    /// `i32`, little-endian.
    pub value_le_i32: String,
    /// `u64`, little-endian.
    pub value_le_u64: String,
    /// `i64`, little-endian.
    pub value_le_i64: String,
    /// `u128`, little-endian.
    pub value_le_u128: String,
    /// `i128`, little-endian.
    pub value_le_i128: String,
    /// `f32`, little-endian.
    pub value_le_f32: String,
    /// `f64`, little-endian.
    pub value_le_f64: String,
    /// Leading ASCII character, little-endian.
    pub char_le_ascii: String,
    /// Leading UTF-8 character, little-endian.
    pub char_le_utf8: String,
    /// Leading UTF-16 character, little-endian.
    pub char_le_utf16: String,
    /// Leading UTF-32 character, little-endian.
    pub char_le_utf32: String,
    /// `u8`. Identical in both byte orders.
    pub value_be_u8: String,
    /// `i8`. Identical in both byte orders.
    pub value_be_i8: String,
    /// `u16`, big-endian.
    pub value_be_u16: String,
    /// `i16`, big-endian.
    pub value_be_i16: String,
    /// `u32`, big-endian.
    pub value_be_u32: String,
    /// `i32`, big-endian.
    pub value_be_i32: String,
    /// `u64`, big-endian.
    pub value_be_u64: String,
    /// `i64`, big-endian.
    pub value_be_i64: String,
    /// `u128`, big-endian.
    pub value_be_u128: String,
    /// `i128`, big-endian.
    pub value_be_i128: String,
    /// `f32`, big-endian.
    pub value_be_f32: String,
    /// `f64`, big-endian.
    pub value_be_f64: String,
    /// Leading ASCII character, big-endian.
    pub char_be_ascii: String,
    /// Leading UTF-8 character, big-endian.
    pub char_be_utf8: String,
    /// Leading UTF-16 character, big-endian.
    pub char_be_utf16: String,
    /// Leading UTF-32 character, big-endian.
    pub char_be_utf32: String,
}

/// Text decodes of the last page read, one character per byte position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDataInPosition {
    /// ASCII, which has no byte order.
    pub text_ascii: String,
    /// UTF-8, little-endian reading.
    pub text_le_utf8: String,
    /// UTF-16, little-endian code units.
    pub text_le_utf16: String,
    /// UTF-32, little-endian code units.
    pub text_le_utf32: String,
    /// UTF-8, big-endian reading.
    pub text_be_utf8: String,
    /// UTF-16, big-endian code units.
    pub text_be_utf16: String,
    /// UTF-32, big-endian code units.
    pub text_be_utf32: String,
}

/// The backend call surface used by the hex view.
///
/// Implementations own the open file handles. Every call may suspend; the
/// components only ever await them inside a [`Cmd`](bubbletea_rs::Cmd), so a
/// slow backend never blocks the event loop. A backend remembers, per file,
/// where it last read: [`read_file_current_pos`](Backend::read_file_current_pos)
/// and [`get_text_data_in_position`](Backend::get_text_data_in_position)
/// work at that position.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use bubbletea_hexview::backend::{decode_file_data, Backend, MemoryBackend};
///
/// # async fn run() {
/// let backend = MemoryBackend::new();
/// let index = backend.open_bytes("data.bin", b"hello".to_vec()).await;
/// let page = backend.read_file(index, 1).await.unwrap();
/// assert_eq!(decode_file_data(&page), b"ello");
///
/// let shared: Arc<dyn Backend> = Arc::new(backend);
/// # let _ = shared;
/// # }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    /// Reads up to [`READ_CHUNK`] bytes starting at `file_pos` and remembers
    /// the position.
    ///
    /// # Errors
    ///
    /// [`BackendError::InvalidFileIndex`] for an unknown file and
    /// [`BackendError::InvalidPosition`] for a position past the end.
    async fn read_file(&self, file_index: usize, file_pos: u64)
        -> Result<FileReadResult, BackendError>;

    /// Reads a chunk from the remembered position.
    async fn read_file_current_pos(&self, file_index: usize)
        -> Result<FileReadResult, BackendError>;

    /// Decodes the bytes at `file_pos` in every supported format.
    async fn get_data_in_position(
        &self,
        file_index: usize,
        file_pos: u64,
    ) -> Result<DataInPosition, BackendError>;

    /// Decodes the chunk at the remembered position as text.
    async fn get_text_data_in_position(
        &self,
        file_index: usize,
    ) -> Result<TextDataInPosition, BackendError>;

    /// Opens a file, read-write when `rw` is set, and returns its index.
    async fn open_file(&self, file_name: &str, rw: bool) -> Result<usize, BackendError>;

    /// Lists every open file in index order.
    async fn get_open_files(&self) -> Result<Vec<AppFileStateResult>, BackendError>;
}

/// Decodes the base64 page payload. Malformed payloads yield an empty page.
///
/// # Examples
///
/// ```rust
/// use bubbletea_hexview::backend::{decode_file_data, FileReadResult};
///
/// let page = FileReadResult { file_index: 0, file_data: "AAH/".to_string() };
/// assert_eq!(decode_file_data(&page), vec![0x00, 0x01, 0xff]);
///
/// let broken = FileReadResult { file_index: 0, file_data: "%%%".to_string() };
/// assert!(decode_file_data(&broken).is_empty());
/// ```
pub fn decode_file_data(result: &FileReadResult) -> Vec<u8> {
    match BASE64_STANDARD.decode(result.file_data.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                target = "hexview.backend",
                file_index = result.file_index,
                error = %err,
                "undecodable page payload, treating as empty"
            );
            Vec::new()
        }
    }
}

/// Encodes bytes as a page payload, the inverse of [`decode_file_data`].
pub fn encode_file_data(file_index: usize, bytes: &[u8]) -> FileReadResult {
    FileReadResult {
        file_index,
        file_data: BASE64_STANDARD.encode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trip() {
        let payload = encode_file_data(3, &[0, 1, 0xfe, 0xff]);
        assert_eq!(payload.file_index, 3);
        assert_eq!(decode_file_data(&payload), vec![0, 1, 0xfe, 0xff]);
    }

    #[test]
    fn malformed_payload_is_empty_page() {
        let payload = FileReadResult {
            file_index: 0,
            file_data: "not base64!!".to_string(),
        };
        assert!(decode_file_data(&payload).is_empty());
    }

    #[test]
    fn wire_field_names() {
        let json = serde_json::to_value(AppFileStateResult {
            file_name: "/tmp/a.bin".into(),
            file_index: 1,
            file_size: 40,
            file_name_no_path: "a.bin".into(),
        })
        .expect("serialize");
        assert_eq!(json["file_name_no_path"], "a.bin");
        assert_eq!(json["file_size"], 40);

        let data = DataInPosition {
            value_be_u128: "2".into(),
            char_le_utf32: "a".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(json.as_object().expect("object").len(), 32);
        assert_eq!(json["value_be_u128"], "2");
        let back: DataInPosition = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, data);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            BackendError::InvalidPosition(99).to_string(),
            "invalid file position 99"
        );
    }
}
