//! An in-process [`Backend`] over byte buffers.
//!
//! Files are registered by name up front and become readable once opened,
//! mirroring a desktop backend that owns open file handles. Each open file
//! remembers the position of its last read and the chunk read there; text
//! decodes always work on that chunk.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::decode::{decode_position, decode_text};
use super::{
    encode_file_data, AppFileStateResult, Backend, BackendError, DataInPosition, FileReadResult,
    TextDataInPosition, READ_CHUNK,
};

#[derive(Debug)]
struct OpenFile {
    name: String,
    bytes: Vec<u8>,
    prev_seek_pos: u64,
    bytes_at_pos: Vec<u8>,
}

impl OpenFile {
    fn chunk_at(&self, pos: u64) -> Vec<u8> {
        let start = pos.min(self.bytes.len() as u64) as usize;
        let end = (start + READ_CHUNK).min(self.bytes.len());
        self.bytes[start..end].to_vec()
    }
}

#[derive(Debug, Default)]
struct State {
    available: HashMap<String, Vec<u8>>,
    open: Vec<OpenFile>,
    fail_reads: bool,
}

impl State {
    fn file(&self, file_index: usize) -> Result<&OpenFile, BackendError> {
        self.open
            .get(file_index)
            .ok_or(BackendError::InvalidFileIndex(file_index))
    }

    fn check_reads(&self) -> Result<(), BackendError> {
        if self.fail_reads {
            Err(BackendError::Io("simulated read failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&mut self, file_index: usize, file_pos: u64) -> Result<FileReadResult, BackendError> {
        self.check_reads()?;
        let file = self
            .open
            .get_mut(file_index)
            .ok_or(BackendError::InvalidFileIndex(file_index))?;
        // An empty file may still be read at 0.
        if file_pos > 0 && file_pos >= file.bytes.len() as u64 {
            return Err(BackendError::InvalidPosition(file_pos));
        }
        let chunk = file.chunk_at(file_pos);
        file.prev_seek_pos = file_pos;
        file.bytes_at_pos = chunk.clone();
        Ok(encode_file_data(file_index, &chunk))
    }
}

/// A [`Backend`] holding whole files in memory.
///
/// Opening a file never touches the disk and the `rw` flag is accepted but
/// has no effect, since nothing is written back.
///
/// # Examples
///
/// ```rust
/// use bubbletea_hexview::backend::{Backend, MemoryBackend};
///
/// # async fn run() {
/// let backend = MemoryBackend::new().with_file("/data/boot.img", vec![0u8; 512]);
/// let index = backend.open_file("/data/boot.img", false).await.unwrap();
///
/// let files = backend.get_open_files().await.unwrap();
/// assert_eq!(files[index].file_name_no_path, "boot.img");
/// assert_eq!(files[index].file_size, 512);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    /// Creates a backend with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file that [`Backend::open_file`] can open by name.
    pub fn with_file(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.state
            .get_mut()
            .available
            .insert(name.into(), bytes.into());
        self
    }

    /// Registers and opens a file in one step, returning its index.
    pub async fn open_bytes(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> usize {
        let name = name.into();
        let bytes = bytes.into();
        let mut state = self.state.lock().await;
        state.available.insert(name.clone(), bytes.clone());
        let bytes_at_pos = bytes[..bytes.len().min(READ_CHUNK)].to_vec();
        state.open.push(OpenFile {
            name,
            bytes,
            prev_seek_pos: 0,
            bytes_at_pos,
        });
        state.open.len() - 1
    }

    /// Makes every read and decode call fail until switched off again.
    pub async fn set_fail_reads(&self, fail: bool) {
        self.state.lock().await.fail_reads = fail;
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn read_file(
        &self,
        file_index: usize,
        file_pos: u64,
    ) -> Result<FileReadResult, BackendError> {
        self.state.lock().await.read(file_index, file_pos)
    }

    async fn read_file_current_pos(
        &self,
        file_index: usize,
    ) -> Result<FileReadResult, BackendError> {
        let mut state = self.state.lock().await;
        let pos = state.file(file_index)?.prev_seek_pos;
        state.read(file_index, pos)
    }

    async fn get_data_in_position(
        &self,
        file_index: usize,
        file_pos: u64,
    ) -> Result<DataInPosition, BackendError> {
        let state = self.state.lock().await;
        state.check_reads()?;
        let file = state.file(file_index)?;
        if file_pos >= file.bytes.len() as u64 {
            return Err(BackendError::InvalidPosition(file_pos));
        }
        let start = file_pos as usize;
        Ok(decode_position(&file.bytes[start..]))
    }

    async fn get_text_data_in_position(
        &self,
        file_index: usize,
    ) -> Result<TextDataInPosition, BackendError> {
        let state = self.state.lock().await;
        state.check_reads()?;
        Ok(decode_text(&state.file(file_index)?.bytes_at_pos))
    }

    async fn open_file(&self, file_name: &str, rw: bool) -> Result<usize, BackendError> {
        let mut state = self.state.lock().await;
        let bytes = state
            .available
            .get(file_name)
            .cloned()
            .ok_or_else(|| BackendError::Io(format!("no such file: {file_name}")))?;
        let bytes_at_pos = bytes[..bytes.len().min(READ_CHUNK)].to_vec();
        state.open.push(OpenFile {
            name: file_name.to_string(),
            bytes,
            prev_seek_pos: 0,
            bytes_at_pos,
        });
        tracing::debug!(target = "hexview.backend", file_name, rw, "opened file");
        Ok(state.open.len() - 1)
    }

    async fn get_open_files(&self) -> Result<Vec<AppFileStateResult>, BackendError> {
        let state = self.state.lock().await;
        Ok(state
            .open
            .iter()
            .enumerate()
            .map(|(file_index, file)| AppFileStateResult {
                file_name: file.name.clone(),
                file_index,
                file_size: file.bytes.len() as u64,
                file_name_no_path: Path::new(&file.name)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.name.clone()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::decode_file_data;

    fn bytes(n: usize) -> Vec<u8> {
        (0..n).map(|i| i as u8).collect()
    }

    #[tokio::test]
    async fn read_remembers_position() {
        let backend = MemoryBackend::new();
        let idx = backend.open_bytes("/tmp/data.bin", bytes(2048)).await;

        let page = backend.read_file(idx, 16).await.expect("read");
        let data = decode_file_data(&page);
        assert_eq!(data.len(), READ_CHUNK);
        assert_eq!(data[0], 16);

        let again = backend.read_file_current_pos(idx).await.expect("read");
        assert_eq!(decode_file_data(&again)[0], 16);
    }

    #[tokio::test]
    async fn short_reads_at_end_of_file() {
        let backend = MemoryBackend::new();
        let idx = backend.open_bytes("a", bytes(40)).await;
        let page = backend.read_file(idx, 32).await.expect("read");
        assert_eq!(decode_file_data(&page), (32u8..40).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn invalid_index_and_position() {
        let backend = MemoryBackend::new();
        let idx = backend.open_bytes("a", bytes(40)).await;
        assert_eq!(
            backend.read_file(idx + 1, 0).await,
            Err(BackendError::InvalidFileIndex(idx + 1))
        );
        assert_eq!(
            backend.read_file(idx, 40).await,
            Err(BackendError::InvalidPosition(40))
        );
        assert_eq!(
            backend.get_data_in_position(idx, 41).await,
            Err(BackendError::InvalidPosition(41))
        );
    }

    #[tokio::test]
    async fn empty_file_reads_empty_page() {
        let backend = MemoryBackend::new();
        let idx = backend.open_bytes("empty", Vec::new()).await;
        let page = backend.read_file_current_pos(idx).await.expect("read");
        assert!(decode_file_data(&page).is_empty());
    }

    #[tokio::test]
    async fn injected_failures() {
        let backend = MemoryBackend::new();
        let idx = backend.open_bytes("a", bytes(40)).await;
        backend.set_fail_reads(true).await;
        assert!(matches!(
            backend.read_file(idx, 0).await,
            Err(BackendError::Io(_))
        ));
        assert!(backend.get_text_data_in_position(idx).await.is_err());
        backend.set_fail_reads(false).await;
        assert!(backend.read_file(idx, 0).await.is_ok());
    }

    #[tokio::test]
    async fn text_follows_last_read() {
        let backend = MemoryBackend::new();
        let idx = backend.open_bytes("t", b"abcdefgh".to_vec()).await;
        backend.read_file(idx, 4).await.expect("read");
        let text = backend.get_text_data_in_position(idx).await.expect("text");
        assert_eq!(text.text_ascii, "efgh");
    }

    #[tokio::test]
    async fn open_registered_file() {
        let backend = MemoryBackend::new().with_file("/var/log/app.bin", bytes(100));
        let idx = backend
            .open_file("/var/log/app.bin", true)
            .await
            .expect("open");
        assert!(backend.open_file("/missing", false).await.is_err());

        let files = backend.get_open_files().await.expect("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_size, 100);
        assert_eq!(files[0].file_name_no_path, "app.bin");
    }
}
