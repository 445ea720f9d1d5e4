//! The hex viewport: a sliding window over one file's bytes.
//!
//! The viewport owns the window start, the focused cell and the page buffer
//! of the current window. Key presses and wheel movement go through the
//! [`navigation`](crate::navigation) engine; every window move marks a page
//! fetch as pending, and the fetch [`Debounce`] turns a burst of moves into a
//! single `read_file` call once scrolling has settled. Every change of the
//! focused offset asks the [`Inspector`] for a fresh position decode, and
//! every page load asks it for the matching text decode.
//!
//! Responses may arrive late and out of order. Each carries the sequence
//! number of its request and only the newest one of its kind is applied. A
//! text decode is also tied to the page read it belongs to: it is dropped
//! once a newer page request has gone out, and the text column stays blank
//! until text for the page on screen arrives. A failed read keeps the
//! previous page on screen, flags it and emits a
//! [`NotificationMsg`](crate::notify::NotificationMsg).
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use bubbletea_hexview::backend::MemoryBackend;
//! use bubbletea_hexview::config::Config;
//! use bubbletea_hexview::viewport::Model;
//! use bubbletea_hexview::Component;
//!
//! # async fn run() {
//! let backend = Arc::new(MemoryBackend::new());
//! let index = backend.open_bytes("data.bin", vec![0u8; 4096]).await;
//!
//! let mut hex = Model::new(index, 4096, backend, Config::default());
//! hex.focus();
//! let _start = hex.init();
//! # }
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bubbletea_rs::{batch, Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;

use crate::backend::{decode_file_data, Backend, BackendError, FileReadResult};
use crate::config::Config;
use crate::debounce::{Debounce, IdleDebounce, Poll, PollMsg};
use crate::format;
use crate::geometry::{is_cell_in_range, last_cell_in_range, Geometry};
use crate::input::{CellEdit, EditOutcome};
use crate::inspector::{Inspector, PositionDataMsg, TextDataMsg};
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::navigation::{navigate, wheel, NavState, Navigation, NavigationKeyMap, WheelMsg};
use crate::notify::{notify, Level};
use crate::request::{RequestKind, RequestTracker};
use crate::Component;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Response to a page fetch.
#[derive(Debug, Clone)]
pub struct PageLoadedMsg {
    /// Id of the viewport that issued the request.
    pub id: i64,
    /// Page request sequence number; only the newest is applied.
    pub seq: u64,
    /// Window start the page was requested for.
    pub window_start: u64,
    /// The page payload, or why the read failed.
    pub result: Result<FileReadResult, BackendError>,
}

/// Key bindings of the hex grid.
///
/// Hex digits are not bound here: any unbound printable key is offered to
/// the cell editor, and the inspector toggles are checked before it.
#[derive(Debug, Clone)]
pub struct ViewportKeyMap {
    /// Cursor and window movement.
    pub navigation: NavigationKeyMap,
    /// Drops a half-typed cell edit.
    pub clear_edit: key::Binding,
}

impl Default for ViewportKeyMap {
    fn default() -> Self {
        Self {
            navigation: NavigationKeyMap::default(),
            clear_edit: key::Binding::new(vec![KeyCode::Backspace])
                .with_help("backspace", "clear edit"),
        }
    }
}

impl KeyMapTrait for ViewportKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        let mut help = self.navigation.short_help();
        help.push(&self.clear_edit);
        help
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        let mut help = self.navigation.full_help();
        help.push(vec![&self.clear_edit]);
        help
    }
}

/// Visual styling of the hex grid.
///
/// # Examples
///
/// ```rust
/// use bubbletea_hexview::viewport::Styles;
/// use lipgloss_extras::prelude::*;
///
/// let styles = Styles {
///     cursor: Style::new().foreground(Color::from("#FFD75F")).bold(true),
///     ..Styles::default()
/// };
/// # let _ = styles;
/// ```
#[derive(Debug, Clone)]
pub struct Styles {
    /// Column header line.
    pub header: Style,
    /// Row offsets on the left.
    pub offset: Style,
    /// Ordinary hex cells.
    pub cell: Style,
    /// The focused cell while the grid holds cell focus.
    pub cursor: Style,
    /// The focused cell while a hex edit is in progress.
    pub edit: Style,
    /// Cells of a page loaded for an earlier window position.
    pub stale: Style,
    /// The text column.
    pub text: Style,
    /// Status line with offset, size and scroll position.
    pub status: Style,
    /// The read failure marker.
    pub error: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new().bold(true),
            offset: Style::new().faint(true),
            cell: Style::new(),
            cursor: Style::new().reverse(true),
            edit: Style::new().underline(true),
            stale: Style::new().faint(true),
            text: Style::new(),
            status: Style::new().faint(true),
            error: Style::new().foreground(Color::from("#FF5F87")),
        }
    }
}

/// Hex viewport over a single open file.
pub struct Model {
    id: i64,
    file_index: usize,
    file_size: u64,
    backend: Arc<dyn Backend>,
    geometry: Geometry,

    window_start: u64,
    cursor: usize,
    page: Vec<u8>,
    page_start: Option<u64>,

    fetch: Debounce,
    idle: IdleDebounce,
    requests: RequestTracker,
    inspector: Inspector,
    edit: CellEdit,

    read_error: bool,
    focus: bool,
    cell_focus: bool,

    /// Render hex digits in upper case.
    pub hex_upper_case: bool,
    /// Whether wheel messages scroll the window.
    pub mouse_wheel_enabled: bool,
    /// Key bindings.
    pub keymap: ViewportKeyMap,
    /// Visual styling.
    pub styles: Styles,
}

impl Model {
    /// Creates a viewport over the open file at `file_index`.
    ///
    /// The window starts at offset 0 with the cursor on the first cell. A
    /// page fetch is already pending, so the first page is read one fetch
    /// debounce after [`init`](Self::init) starts the polling ticks.
    ///
    /// # Arguments
    ///
    /// * `file_index` - Index of the file in the backend.
    /// * `file_size` - Length of the file in bytes. Every navigation bound is
    ///   derived from it and it never changes.
    /// * `backend` - Where pages and decodes come from.
    /// * `config` - Grid height, hex case, debounce timings, wheel support.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use bubbletea_hexview::backend::MemoryBackend;
    /// use bubbletea_hexview::config::Config;
    /// use bubbletea_hexview::viewport::Model;
    ///
    /// # async fn run() {
    /// let backend = Arc::new(MemoryBackend::new());
    /// let index = backend.open_bytes("data.bin", vec![0u8; 100]).await;
    ///
    /// let hex = Model::new(index, 100, backend, Config::new().with_rows(4));
    /// assert_eq!(hex.geometry().page_size(), 64);
    /// assert_eq!(hex.window_start(), 0);
    /// assert!(hex.fetch_pending());
    /// # }
    /// ```
    pub fn new(
        file_index: usize,
        file_size: u64,
        backend: Arc<dyn Backend>,
        config: Config,
    ) -> Self {
        let mut inspector = Inspector::new(file_index, Arc::clone(&backend));
        inspector.upper_case = config.hex_upper_case;
        Self {
            id: next_id(),
            file_index,
            file_size,
            backend,
            geometry: Geometry::new(config.rows()),
            window_start: 0,
            cursor: 0,
            page: Vec::new(),
            page_start: None,
            fetch: Debounce::with_poll_interval(config.fetch_debounce(), config.poll_interval()),
            idle: IdleDebounce::with_poll_interval(config.idle_timeout(), config.poll_interval()),
            requests: RequestTracker::new(),
            inspector,
            edit: CellEdit::new(),
            read_error: false,
            focus: false,
            cell_focus: true,
            hex_upper_case: config.hex_upper_case,
            mouse_wheel_enabled: config.mouse_wheel_enabled,
            keymap: ViewportKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Replaces the default styles.
    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Unique id carried by this viewport's page responses.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Backend index of the file shown.
    pub fn file_index(&self) -> usize {
        self.file_index
    }

    /// Length of the file shown.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Grid dimensions.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// File offset of the first cell.
    pub fn window_start(&self) -> u64 {
        self.window_start
    }

    /// Cell id of the focused cell, counted from the top left.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Absolute offset of the focused cell.
    pub fn cursor_offset(&self) -> u64 {
        self.nav_state().cursor_offset()
    }

    /// Window start and cursor as navigation input.
    pub fn nav_state(&self) -> NavState {
        NavState {
            window_start: self.window_start,
            cursor: self.cursor,
        }
    }

    /// The bytes of the last page loaded.
    pub fn page(&self) -> &[u8] {
        &self.page
    }

    /// Window start of the last page loaded, `None` before the first load.
    pub fn page_start(&self) -> Option<u64> {
        self.page_start
    }

    /// Whether the page on screen belongs to an earlier window position.
    pub fn page_is_stale(&self) -> bool {
        self.page_start != Some(self.window_start)
    }

    /// Whether the latest page read failed.
    pub fn read_error(&self) -> bool {
        self.read_error
    }

    /// Whether a page fetch is waiting for scrolling to settle.
    pub fn fetch_pending(&self) -> bool {
        self.fetch.pending()
    }

    /// The position inspector of this file.
    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    /// Mutable access to the inspector, e.g. to restyle it.
    pub fn inspector_mut(&mut self) -> &mut Inspector {
        &mut self.inspector
    }

    /// The digits of an unfinished cell edit.
    pub fn pending_edit(&self) -> Option<&str> {
        self.edit.pending()
    }

    /// Whether key presses reach the grid.
    pub fn has_cell_focus(&self) -> bool {
        self.cell_focus
    }

    /// Hands keyboard focus to something outside the grid. Focus returns
    /// to the cursor cell once the user has been idle long enough.
    pub fn release_cell_focus(&mut self) {
        self.cell_focus = false;
        self.edit.reset();
    }

    /// Slider position in `0.0..=1.0`.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.geometry.max_window_start(self.file_size);
        if max == 0 {
            return 1.0;
        }
        (self.window_start as f64 / max as f64).clamp(0.0, 1.0)
    }

    /// Whether `msg` is a response or tick addressed to this viewport.
    pub fn owns(&self, msg: &Msg) -> bool {
        if let Some(poll) = msg.downcast_ref::<PollMsg>() {
            return poll.id == self.fetch.id() || poll.id == self.idle.id();
        }
        if let Some(page) = msg.downcast_ref::<PageLoadedMsg>() {
            return page.id == self.id;
        }
        if let Some(position) = msg.downcast_ref::<PositionDataMsg>() {
            return position.id == self.inspector.id();
        }
        if let Some(text) = msg.downcast_ref::<TextDataMsg>() {
            return text.id == self.inspector.id();
        }
        false
    }

    /// Starts the polling ticks and the first position decode.
    pub fn init(&mut self) -> Cmd {
        let mut cmds = vec![self.fetch.init(), self.idle.init()];
        if self.file_size > 0 {
            let offset = self.cursor_offset();
            cmds.push(self.inspector.inspect(offset));
        }
        batch(cmds)
    }

    /// Direct window positioning, e.g. from a slider. Out-of-range positions
    /// are clamped.
    ///
    /// The cursor keeps its cell id unless that cell would fall past the end
    /// of the file. Returns the inspector request when the focused offset
    /// changed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use bubbletea_hexview::backend::MemoryBackend;
    /// use bubbletea_hexview::config::Config;
    /// use bubbletea_hexview::viewport::Model;
    ///
    /// # async fn run() {
    /// let backend = Arc::new(MemoryBackend::new());
    /// let index = backend.open_bytes("data.bin", vec![0u8; 1000]).await;
    /// let mut hex = Model::new(index, 1000, backend, Config::new().with_rows(2));
    ///
    /// hex.set_window_start(5000);
    /// assert_eq!(hex.window_start(), 968);
    /// assert_eq!(hex.scroll_percent(), 1.0);
    /// # }
    /// ```
    pub fn set_window_start(&mut self, pos: u64) -> Option<Cmd> {
        let old_offset = self.cursor_offset();
        let pos = pos.min(self.geometry.max_window_start(self.file_size));
        self.move_window(pos);
        self.clamp_cursor();
        self.after_move(old_offset)
    }

    /// Applies a page read from the backend's remembered position, used to
    /// show a freshly opened file before the first debounced fetch lands.
    ///
    /// Returns the text decode request for the seeded page, or `None` when a
    /// page has already loaded and the seed is ignored.
    pub fn seed(&mut self, page: &FileReadResult) -> Option<Cmd> {
        if self.page_start.is_some() {
            return None;
        }
        let mut bytes = decode_file_data(page);
        bytes.truncate(self.geometry.page_size());
        self.page = bytes;
        self.page_start = Some(0);
        let page_seq = self.requests.latest(RequestKind::Page);
        Some(self.inspector.refresh_text(0, page_seq))
    }

    /// Requests the page for the current window.
    ///
    /// The fetch debounce calls this once scrolling settles; hosts rarely
    /// need it directly.
    pub fn fetch_page(&mut self) -> Cmd {
        let seq = self.requests.issue(RequestKind::Page);
        let id = self.id;
        let file_index = self.file_index;
        let window_start = self.window_start;
        let backend = Arc::clone(&self.backend);
        tracing::debug!(
            target = "hexview.viewport",
            file_index,
            window_start,
            seq,
            "fetching page"
        );
        Box::pin(async move {
            let result = backend.read_file(file_index, window_start).await;
            Some(Box::new(PageLoadedMsg {
                id,
                seq,
                window_start,
                result,
            }) as Msg)
        })
    }

    /// Applies a page response.
    pub fn apply_page(&mut self, msg: PageLoadedMsg) -> Option<Cmd> {
        if msg.id != self.id {
            return None;
        }
        if !self.requests.is_current(RequestKind::Page, msg.seq) {
            tracing::debug!(
                target = "hexview.viewport",
                seq = msg.seq,
                latest = self.requests.latest(RequestKind::Page),
                window_start = msg.window_start,
                "discarding stale page"
            );
            return None;
        }
        match msg.result {
            Ok(payload) => {
                let mut bytes = decode_file_data(&payload);
                bytes.truncate(self.geometry.page_size());
                self.page = bytes;
                self.page_start = Some(msg.window_start);
                self.read_error = false;
                Some(self.inspector.refresh_text(msg.window_start, msg.seq))
            }
            Err(err) => {
                self.read_error = true;
                tracing::warn!(
                    target = "hexview.viewport",
                    file_index = self.file_index,
                    window_start = msg.window_start,
                    error = %err,
                    "page read failed"
                );
                Some(notify(Level::Error, format!("Failed to read file: {err}")))
            }
        }
    }

    /// Applies a text decode if no page request has gone out since the read
    /// it decodes. Later requests may have moved the backend's read position.
    pub fn apply_text(&mut self, msg: TextDataMsg) -> Option<Cmd> {
        if msg.id != self.inspector.id() {
            return None;
        }
        let latest = self.requests.latest(RequestKind::Page);
        if msg.page_seq != latest {
            tracing::debug!(
                target = "hexview.viewport",
                page_seq = msg.page_seq,
                latest,
                window_start = msg.window_start,
                "discarding text decode of a superseded page"
            );
            return None;
        }
        self.inspector.apply_text(msg)
    }

    /// Processes one message.
    ///
    /// Polling ticks, page responses and inspector responses are always
    /// handled. Key presses and wheel movement are handled only while the
    /// viewport is focused; use [`owns`](Self::owns) to route responses to
    /// background viewports.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use bubbletea_hexview::backend::MemoryBackend;
    /// use bubbletea_hexview::config::Config;
    /// use bubbletea_hexview::viewport::Model;
    /// use bubbletea_hexview::Component;
    /// use bubbletea_rs::{KeyMsg, Msg};
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// # async fn run() {
    /// let backend = Arc::new(MemoryBackend::new());
    /// let index = backend.open_bytes("data.bin", vec![0u8; 1000]).await;
    /// let mut hex = Model::new(index, 1000, backend, Config::new().with_rows(2));
    /// hex.focus();
    ///
    /// let right: Msg = Box::new(KeyMsg { key: KeyCode::Right, modifiers: KeyModifiers::NONE });
    /// let inspect = hex.update(right);
    /// assert_eq!(hex.cursor_offset(), 1);
    /// assert!(inspect.is_some());
    /// # }
    /// ```
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        match self.fetch.update(&msg) {
            Poll::Fire(next) if self.file_size > 0 => {
                return Some(batch(vec![next, self.fetch_page()]))
            }
            Poll::Fire(next) | Poll::Waiting(next) => return Some(next),
            Poll::Ignored => {}
        }
        let idle = self.idle.update(&msg);
        if idle.fired() {
            self.restore_cell_focus();
        }
        if let Some(next) = idle.into_cmd() {
            return Some(next);
        }

        let msg = match msg.downcast::<PageLoadedMsg>() {
            Ok(page) => return self.apply_page(*page),
            Err(other) => other,
        };
        let msg = match msg.downcast::<TextDataMsg>() {
            Ok(text) => return self.apply_text(*text),
            Err(other) => other,
        };
        if msg.is::<PositionDataMsg>() {
            return self.inspector.update(msg);
        }

        if !self.focus {
            return None;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }
        if let Some(wheel_msg) = msg.downcast_ref::<WheelMsg>() {
            return self.handle_wheel(wheel_msg);
        }
        None
    }

    /// Handles a key press while this viewport is the active one.
    pub fn handle_key(&mut self, msg: &KeyMsg) -> Option<Cmd> {
        if !self.cell_focus || self.file_size == 0 {
            return None;
        }
        if let Some(nav_key) = self.keymap.navigation.resolve(msg) {
            let nav = navigate(nav_key, self.nav_state(), self.geometry, self.file_size);
            return self.apply_navigation(nav);
        }
        if self.inspector.handle_key(msg) {
            return None;
        }
        if self.keymap.clear_edit.matches(msg) {
            self.edit.backspace();
            return None;
        }
        if let KeyCode::Char(c) = msg.key {
            if msg
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                return None;
            }
            if CellEdit::accepts(c) {
                self.edit_cell(c);
            } else {
                self.drop_edit();
            }
        }
        None
    }

    /// Scrolls the window by one row per wheel notch. The cursor keeps its
    /// cell id.
    pub fn handle_wheel(&mut self, msg: &WheelMsg) -> Option<Cmd> {
        if !self.mouse_wheel_enabled {
            return None;
        }
        let nav = wheel(msg.delta_y, self.nav_state(), self.geometry, self.file_size);
        self.apply_navigation(nav)
    }

    fn apply_navigation(&mut self, nav: Navigation) -> Option<Cmd> {
        let old_offset = self.cursor_offset();
        match nav {
            Navigation::Ignored => return None,
            Navigation::Focus(cursor) => self.cursor = cursor,
            Navigation::Scroll {
                window_start,
                focus,
            } => {
                self.move_window(window_start);
                if let Some(cursor) = focus {
                    self.cursor = cursor;
                }
            }
        }
        self.clamp_cursor();
        self.after_move(old_offset)
    }

    fn move_window(&mut self, window_start: u64) {
        if window_start == self.window_start {
            return;
        }
        self.window_start = window_start;
        self.fetch.touch();
    }

    fn clamp_cursor(&mut self) {
        if let Some(last) =
            last_cell_in_range(self.window_start, self.geometry.page_size(), self.file_size)
        {
            self.cursor = self.cursor.min(last);
        } else {
            self.cursor = 0;
        }
    }

    fn after_move(&mut self, old_offset: u64) -> Option<Cmd> {
        let offset = self.cursor_offset();
        if offset == old_offset {
            return None;
        }
        self.drop_edit();
        Some(self.inspector.inspect(offset))
    }

    fn drop_edit(&mut self) {
        if self.edit.is_editing() {
            tracing::debug!(
                target = "hexview.viewport",
                cursor = self.cursor,
                "dropping partial cell edit"
            );
            self.edit.reset();
        }
    }

    fn restore_cell_focus(&mut self) {
        if self.focus && !self.cell_focus {
            tracing::debug!(
                target = "hexview.viewport",
                cursor = self.cursor,
                "restoring cell focus after idle"
            );
            self.cell_focus = true;
        }
    }

    fn byte_at(&self, offset: u64) -> Option<u8> {
        let start = self.page_start?;
        let index = usize::try_from(offset.checked_sub(start)?).ok()?;
        self.page.get(index).copied()
    }

    fn edit_cell(&mut self, c: char) {
        match self.edit.input(c) {
            EditOutcome::Complete(value) => {
                let offset = self.cursor_offset();
                let Some(index) = self
                    .page_start
                    .and_then(|start| offset.checked_sub(start))
                    .and_then(|i| usize::try_from(i).ok())
                    .filter(|i| *i < self.page.len())
                else {
                    return;
                };
                self.page[index] = value;
                tracing::debug!(
                    target = "hexview.viewport",
                    offset,
                    value,
                    "cell edited"
                );
            }
            EditOutcome::Partial | EditOutcome::Rejected | EditOutcome::Cleared => {}
        }
    }

    fn render_cell(&self, id: usize) -> String {
        if !is_cell_in_range(self.window_start, id, self.file_size) {
            return "  ".to_string();
        }
        let offset = self.window_start + id as u64;
        let is_cursor = self.focus && self.cell_focus && id == self.cursor;

        if is_cursor {
            if let Some(digits) = self.edit.pending() {
                return self.styles.edit.render(&format!("{digits}_"));
            }
        }
        let text = match self.byte_at(offset) {
            Some(byte) => format::hex_byte(byte, self.hex_upper_case),
            None => "--".to_string(),
        };
        if is_cursor {
            self.styles.cursor.render(&text)
        } else if self.page_is_stale() {
            self.styles.stale.render(&text)
        } else {
            self.styles.cell.render(&text)
        }
    }

    fn render_text(&self, row: usize) -> String {
        let columns = self.geometry.columns;
        let mut out = String::new();
        for column in 0..columns {
            let id = self.geometry.cell_id(row, column);
            let offset = self.window_start + id as u64;
            let c = self
                .page_start
                .filter(|start| self.inspector.text_start() == Some(*start))
                .filter(|_| is_cell_in_range(self.window_start, id, self.file_size))
                .and_then(|start| offset.checked_sub(start))
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.inspector.text_cell(i))
                .map(format::single_width)
                .unwrap_or(' ');
            out.push(c);
        }
        self.styles.text.render(&out)
    }

    fn status_line(&self) -> String {
        let status = format!(
            "{} / {}  {:>3.0}%",
            format::hex_offset(self.cursor_offset(), self.hex_upper_case),
            format::hex_offset(self.file_size, self.hex_upper_case),
            self.scroll_percent() * 100.0
        );
        let mut line = self.styles.status.render(&status);
        if self.read_error {
            line.push_str("  ");
            line.push_str(&self.styles.error.render("read failed"));
        }
        line
    }

    /// Renders the column header, the hex rows with their text column, the
    /// status line and the inspector panel.
    ///
    /// Cells past the end of the file are blank. Cells with no loaded data
    /// show `--`, and cells of a page loaded for another window position are
    /// dimmed.
    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(self.geometry.rows + 3);
        lines.push(
            self.styles
                .header
                .render(&format::column_header(self.hex_upper_case)),
        );
        for row in 0..self.geometry.rows {
            let offset = self.geometry.cell_offset(self.window_start, row, 0);
            let mut line = self
                .styles
                .offset
                .render(&format::hex_offset(offset, self.hex_upper_case));
            for column in 0..self.geometry.columns {
                line.push(' ');
                line.push_str(&self.render_cell(self.geometry.cell_id(row, column)));
            }
            line.push_str("  ");
            line.push_str(&self.render_text(row));
            lines.push(line);
        }
        lines.push(self.status_line());
        lines.push(String::new());
        lines.push(self.inspector.view());
        lines.join("\n")
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
        self.edit.reset();
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests;
