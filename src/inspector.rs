//! The position inspector panel.
//!
//! Shows the backend's multi-format decode of the bytes at the focused
//! offset, and holds the text decode of the last page read so the viewport
//! can draw its text column. Requests are issued on every focus change and
//! after every page load; a response only applies if no newer request of its
//! kind went out in the meantime. Failed requests keep the last good values
//! on screen and raise an error notification.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bubbletea_rs::{Cmd, KeyMsg, Msg};
use lipgloss_extras::prelude::*;

use crate::backend::{Backend, BackendError, DataInPosition, TextDataInPosition};
use crate::format::{self, CharacterMode, Endian};
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::notify::{notify, Level};
use crate::request::{RequestKind, RequestTracker};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Response to [`Inspector::inspect`].
#[derive(Debug, Clone)]
pub struct PositionDataMsg {
    /// Id of the inspector that issued the request.
    pub id: i64,
    /// Request sequence number; only the newest is applied.
    pub seq: u64,
    /// Offset that was decoded.
    pub offset: u64,
    /// The decode, or why it failed.
    pub result: Result<DataInPosition, BackendError>,
}

/// Response to [`Inspector::refresh_text`].
#[derive(Debug, Clone)]
pub struct TextDataMsg {
    /// Id of the inspector that issued the request.
    pub id: i64,
    /// Request sequence number; only the newest is applied.
    pub seq: u64,
    /// Sequence number of the page request whose read this text decodes.
    pub page_seq: u64,
    /// Window start of that page.
    pub window_start: u64,
    /// The decode, or why it failed.
    pub result: Result<TextDataInPosition, BackendError>,
}

/// Key bindings of the inspector toggles.
///
/// Letters that are hex digits are avoided because the viewport feeds those
/// to the cell editor.
#[derive(Debug, Clone)]
pub struct InspectorKeyMap {
    /// Flips the byte order of the numeric table.
    pub toggle_endian: key::Binding,
    /// Flips the byte order of the text column.
    pub toggle_text_endian: key::Binding,
    /// Cycles ASCII, UTF-8, UTF-16 and UTF-32.
    pub cycle_mode: key::Binding,
}

impl Default for InspectorKeyMap {
    fn default() -> Self {
        Self {
            toggle_endian: key::Binding::new(vec!["i"]).with_help("i", "value byte order"),
            toggle_text_endian: key::Binding::new(vec!["t"]).with_help("t", "text byte order"),
            cycle_mode: key::Binding::new(vec!["m"]).with_help("m", "character set"),
        }
    }
}

impl KeyMapTrait for InspectorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.toggle_endian, &self.cycle_mode]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![
            &self.toggle_endian,
            &self.toggle_text_endian,
            &self.cycle_mode,
        ]]
    }
}

/// Visual styling of the inspector panel.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Header line with offset, byte orders and character mode.
    pub title: Style,
    /// Row labels such as `u16`.
    pub label: Style,
    /// Decoded values.
    pub value: Style,
    /// The decode failure marker.
    pub error: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            title: Style::new().bold(true),
            label: Style::new().faint(true),
            value: Style::new(),
            error: Style::new().foreground(Color::from("#FF5F87")),
        }
    }
}

/// Inspector state for one open file.
pub struct Inspector {
    id: i64,
    file_index: usize,
    backend: Arc<dyn Backend>,
    requests: RequestTracker,

    data: Option<DataInPosition>,
    data_offset: Option<u64>,
    text: Option<TextDataInPosition>,
    text_start: Option<u64>,
    position_error: bool,
    text_error: bool,

    /// Byte order of the numeric table.
    pub endian: Endian,
    /// Byte order of the text column.
    pub text_endian: Endian,
    /// Character set of the text column.
    pub mode: CharacterMode,
    /// Render the offset header in upper case hex.
    pub upper_case: bool,
    /// Toggle key bindings.
    pub keymap: InspectorKeyMap,
    /// Visual styling.
    pub styles: Styles,
}

impl Inspector {
    /// Creates an inspector for the open file at `file_index`.
    ///
    /// Nothing is requested until [`inspect`](Self::inspect) or
    /// [`refresh_text`](Self::refresh_text) is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use bubbletea_hexview::backend::MemoryBackend;
    /// use bubbletea_hexview::inspector::Inspector;
    ///
    /// # async fn run() {
    /// let backend = Arc::new(MemoryBackend::new());
    /// let index = backend.open_bytes("data.bin", vec![0x2a, 0x00]).await;
    /// let mut inspector = Inspector::new(index, backend);
    ///
    /// let msg = inspector.inspect(0).await.unwrap();
    /// inspector.update(msg);
    /// assert_eq!(inspector.data().unwrap().value_le_u16, "42");
    /// # }
    /// ```
    pub fn new(file_index: usize, backend: Arc<dyn Backend>) -> Self {
        Self {
            id: next_id(),
            file_index,
            backend,
            requests: RequestTracker::new(),
            data: None,
            data_offset: None,
            text: None,
            text_start: None,
            position_error: false,
            text_error: false,
            endian: Endian::default(),
            text_endian: Endian::default(),
            mode: CharacterMode::default(),
            upper_case: true,
            keymap: InspectorKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Unique id carried by this inspector's responses.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The last successful position decode.
    pub fn data(&self) -> Option<&DataInPosition> {
        self.data.as_ref()
    }

    /// Offset of the decode currently shown.
    pub fn data_offset(&self) -> Option<u64> {
        self.data_offset
    }

    /// The last successful text decode.
    pub fn text(&self) -> Option<&TextDataInPosition> {
        self.text.as_ref()
    }

    /// Window start of the page the current text decode belongs to.
    pub fn text_start(&self) -> Option<u64> {
        self.text_start
    }

    /// Whether the latest position decode failed.
    pub fn position_error(&self) -> bool {
        self.position_error
    }

    /// Whether the latest text decode failed.
    pub fn text_error(&self) -> bool {
        self.text_error
    }

    /// Flips the byte order of the numeric table.
    pub fn toggle_endian(&mut self) {
        self.endian = self.endian.toggle();
    }

    /// Flips the byte order of the text column.
    pub fn toggle_text_endian(&mut self) {
        self.text_endian = self.text_endian.toggle();
    }

    /// Moves the text column to the next character set.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    /// Requests the decode of the bytes at `offset`.
    pub fn inspect(&mut self, offset: u64) -> Cmd {
        let seq = self.requests.issue(RequestKind::Position);
        let id = self.id;
        let file_index = self.file_index;
        let backend = Arc::clone(&self.backend);
        tracing::debug!(
            target = "hexview.inspector",
            file_index,
            offset,
            seq,
            "requesting position decode"
        );
        Box::pin(async move {
            let result = backend.get_data_in_position(file_index, offset).await;
            Some(Box::new(PositionDataMsg {
                id,
                seq,
                offset,
                result,
            }) as Msg)
        })
    }

    /// Requests the text decode of the last page read.
    ///
    /// The backend decodes at its remembered read position, so the caller
    /// names the page it just read. The response carries both values back
    /// and the caller decides whether the page is still current.
    ///
    /// # Arguments
    ///
    /// * `window_start` - Window start of the page that was read.
    /// * `page_seq` - Sequence number of that page request.
    pub fn refresh_text(&mut self, window_start: u64, page_seq: u64) -> Cmd {
        let seq = self.requests.issue(RequestKind::Text);
        let id = self.id;
        let file_index = self.file_index;
        let backend = Arc::clone(&self.backend);
        tracing::debug!(
            target = "hexview.inspector",
            file_index,
            window_start,
            page_seq,
            seq,
            "requesting text decode"
        );
        Box::pin(async move {
            let result = backend.get_text_data_in_position(file_index).await;
            Some(Box::new(TextDataMsg {
                id,
                seq,
                page_seq,
                window_start,
                result,
            }) as Msg)
        })
    }

    /// Applies a position decode response. Returns a notification command on
    /// failure.
    pub fn apply_position(&mut self, msg: PositionDataMsg) -> Option<Cmd> {
        if msg.id != self.id {
            return None;
        }
        if !self.requests.is_current(RequestKind::Position, msg.seq) {
            tracing::debug!(
                target = "hexview.inspector",
                seq = msg.seq,
                latest = self.requests.latest(RequestKind::Position),
                "discarding stale position decode"
            );
            return None;
        }
        match msg.result {
            Ok(data) => {
                self.data = Some(data);
                self.data_offset = Some(msg.offset);
                self.position_error = false;
                None
            }
            Err(err) => {
                self.position_error = true;
                tracing::warn!(
                    target = "hexview.inspector",
                    file_index = self.file_index,
                    offset = msg.offset,
                    error = %err,
                    "position decode failed"
                );
                Some(notify(
                    Level::Error,
                    format!("Failed to decode data at {:#x}: {err}", msg.offset),
                ))
            }
        }
    }

    /// Applies a text decode response. Returns a notification command on
    /// failure.
    pub fn apply_text(&mut self, msg: TextDataMsg) -> Option<Cmd> {
        if msg.id != self.id {
            return None;
        }
        if !self.requests.is_current(RequestKind::Text, msg.seq) {
            tracing::debug!(
                target = "hexview.inspector",
                seq = msg.seq,
                latest = self.requests.latest(RequestKind::Text),
                "discarding stale text decode"
            );
            return None;
        }
        match msg.result {
            Ok(text) => {
                self.text = Some(text);
                self.text_start = Some(msg.window_start);
                self.text_error = false;
                None
            }
            Err(err) => {
                self.text_error = true;
                tracing::warn!(
                    target = "hexview.inspector",
                    file_index = self.file_index,
                    window_start = msg.window_start,
                    error = %err,
                    "text decode failed"
                );
                Some(notify(Level::Error, format!("Failed to decode text: {err}")))
            }
        }
    }

    /// Handles decode responses and the panel's toggle keys.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<PositionDataMsg>() {
            Ok(position) => return self.apply_position(*position),
            Err(other) => other,
        };
        let msg = match msg.downcast::<TextDataMsg>() {
            Ok(text) => return self.apply_text(*text),
            Err(other) => other,
        };
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg);
        }
        None
    }

    /// Applies a toggle key. Returns whether the key was one of ours.
    pub fn handle_key(&mut self, msg: &KeyMsg) -> bool {
        if self.keymap.toggle_endian.matches(msg) {
            self.toggle_endian();
        } else if self.keymap.toggle_text_endian.matches(msg) {
            self.toggle_text_endian();
        } else if self.keymap.cycle_mode.matches(msg) {
            self.cycle_mode();
        } else {
            return false;
        }
        true
    }

    /// Text column character for cell `index` of the last page read.
    pub fn text_cell(&self, index: usize) -> Option<char> {
        self.text
            .as_ref()
            .and_then(|text| format::text_cell(text, index, self.text_endian, self.mode))
    }

    /// Renders the header line and the numeric table for the current byte
    /// order, plus a failure marker when the last decode failed.
    pub fn view(&self) -> String {
        let mut lines = Vec::new();
        let offset = self
            .data_offset
            .map(|o| format::hex_offset(o, self.upper_case))
            .unwrap_or_else(|| "-".repeat(8));
        lines.push(self.styles.title.render(&format!(
            "{offset}  {}  {} {}",
            self.endian, self.mode, self.text_endian
        )));

        if let Some(data) = &self.data {
            for row in format::inspector_rows(data, self.endian) {
                let label = self
                    .styles
                    .label
                    .render(&format::pad_to_width(row.label, 6));
                lines.push(format!("{label}{}", self.styles.value.render(&row.value)));
            }
        }
        if self.position_error || self.text_error {
            lines.push(self.styles.error.render("decode failed"));
        }
        lines.join("\n")
    }
}
