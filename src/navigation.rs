//! Keyboard and mouse-wheel navigation over the hex grid.
//!
//! Navigation is a pure function of the current window start, the focused
//! cell and the file size. Each event yields at most one [`Navigation`]
//! effect: move the cursor inside the current window, or shift the window by
//! a row or a page (optionally repositioning the cursor so the focused byte
//! keeps its place on screen). Events that would be a no-op at a boundary are
//! [`Navigation::Ignored`] and should be left to the host.
//!
//! ```rust
//! use bubbletea_hexview::geometry::Geometry;
//! use bubbletea_hexview::navigation::{navigate, NavKey, NavState, Navigation};
//!
//! let g = Geometry::new(2);
//! let state = NavState { window_start: 0, cursor: 31 };
//!
//! // Leaving the last cell shifts the window one row and keeps the
//! // cursor on the byte after the old one.
//! let nav = navigate(NavKey::Right, state, g, 1000);
//! assert_eq!(nav, Navigation::Scroll { window_start: 16, focus: Some(16) });
//! ```

use crate::geometry::{last_cell_in_range, Geometry};
use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};

/// The six keyboard moves understood by the navigation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Jump to the first cell, or back one page from there.
    PageUp,
    /// Jump to the last cell, or forward one page from there.
    PageDown,
    /// One row up, shifting the window from the top row.
    Up,
    /// One row down, shifting the window from the bottom row.
    Down,
    /// One byte back.
    Left,
    /// One byte forward.
    Right,
}

/// Window start and focused cell id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    /// File offset of the first cell.
    pub window_start: u64,
    /// Cell id of the focused cell.
    pub cursor: usize,
}

impl NavState {
    /// Absolute offset of the focused cell.
    pub fn cursor_offset(&self) -> u64 {
        self.window_start + self.cursor as u64
    }
}

/// Effect of a navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Nothing to do; the event was not consumed.
    Ignored,
    /// Focus another cell of the current window.
    Focus(usize),
    /// Move the window, optionally refocusing a cell of the new window.
    Scroll {
        /// The new window start, already clamped.
        window_start: u64,
        /// Cell to focus afterwards; `None` keeps the cursor's cell id.
        focus: Option<usize>,
    },
}

impl Navigation {
    /// Whether the event had an effect and should not reach the host.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Navigation::Ignored)
    }

    /// Returns the state after this effect.
    pub fn apply(&self, state: NavState) -> NavState {
        match *self {
            Navigation::Ignored => state,
            Navigation::Focus(cursor) => NavState { cursor, ..state },
            Navigation::Scroll {
                window_start,
                focus,
            } => NavState {
                window_start,
                cursor: focus.unwrap_or(state.cursor),
            },
        }
    }
}

/// A mouse wheel movement. Negative `delta_y` scrolls towards the file start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelMsg {
    /// Notches scrolled; only the sign matters.
    pub delta_y: i32,
}

impl WheelMsg {
    /// Converts a terminal scroll event; other mouse events yield `None`.
    pub fn from_mouse_event(event: &MouseEvent) -> Option<Self> {
        match event.kind {
            MouseEventKind::ScrollUp => Some(Self { delta_y: -1 }),
            MouseEventKind::ScrollDown => Some(Self { delta_y: 1 }),
            _ => None,
        }
    }
}

/// Key bindings for grid navigation.
#[derive(Debug, Clone)]
pub struct NavigationKeyMap {
    /// [`NavKey::PageUp`].
    pub page_up: key::Binding,
    /// [`NavKey::PageDown`].
    pub page_down: key::Binding,
    /// [`NavKey::Up`].
    pub up: key::Binding,
    /// [`NavKey::Down`].
    pub down: key::Binding,
    /// [`NavKey::Left`].
    pub left: key::Binding,
    /// [`NavKey::Right`].
    pub right: key::Binding,
}

impl Default for NavigationKeyMap {
    fn default() -> Self {
        // No letter aliases: hex digits belong to the cell editor.
        Self {
            page_up: key::Binding::new(vec![KeyCode::PageUp]).with_help("pgup", "page up"),
            page_down: key::Binding::new(vec![KeyCode::PageDown]).with_help("pgdn", "page down"),
            up: key::Binding::new(vec![KeyCode::Up]).with_help("↑", "up"),
            down: key::Binding::new(vec![KeyCode::Down]).with_help("↓", "down"),
            left: key::Binding::new(vec![KeyCode::Left]).with_help("←", "previous byte"),
            right: key::Binding::new(vec![KeyCode::Right]).with_help("→", "next byte"),
        }
    }
}

impl NavigationKeyMap {
    /// Maps a key message to a navigation key.
    pub fn resolve(&self, msg: &KeyMsg) -> Option<NavKey> {
        if self.page_up.matches(msg) {
            Some(NavKey::PageUp)
        } else if self.page_down.matches(msg) {
            Some(NavKey::PageDown)
        } else if self.up.matches(msg) {
            Some(NavKey::Up)
        } else if self.down.matches(msg) {
            Some(NavKey::Down)
        } else if self.left.matches(msg) {
            Some(NavKey::Left)
        } else if self.right.matches(msg) {
            Some(NavKey::Right)
        } else {
            None
        }
    }
}

impl KeyMapTrait for NavigationKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.up, &self.down, &self.page_up, &self.page_down]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.up, &self.down],
            vec![&self.left, &self.right],
            vec![&self.page_up, &self.page_down],
        ]
    }
}

/// Computes the effect of a key press.
///
/// Moves stay inside the window while they can. At the window's edge they
/// shift the window instead, clamped to `0..=max_window_start`. Cells past
/// the end of the file are never focused, and a file of size 0 ignores
/// every key.
///
/// # Arguments
///
/// * `key` - The move to make.
/// * `state` - Current window start and cursor.
/// * `geometry` - Grid dimensions.
/// * `file_size` - Length of the file in bytes.
///
/// # Examples
///
/// ```rust
/// use bubbletea_hexview::geometry::Geometry;
/// use bubbletea_hexview::navigation::{navigate, NavKey, NavState, Navigation};
///
/// let g = Geometry::new(2);
///
/// // 40 bytes leave room for one 8-byte shift, not a whole row.
/// let state = NavState { window_start: 0, cursor: 31 };
/// let nav = navigate(NavKey::Down, state, g, 40);
/// assert_eq!(nav, Navigation::Scroll { window_start: 8, focus: None });
///
/// let at_end = nav.apply(state);
/// assert_eq!(navigate(NavKey::Down, at_end, g, 40), Navigation::Ignored);
/// ```
pub fn navigate(key: NavKey, state: NavState, geometry: Geometry, file_size: u64) -> Navigation {
    let ws = state.window_start;
    let Some(last) = last_cell_in_range(ws, geometry.page_size(), file_size) else {
        return Navigation::Ignored;
    };
    let id = state.cursor.min(last);
    let max_id = geometry.max_id();
    let max_pos = geometry.max_window_start(file_size);
    let columns = geometry.columns as u64;
    let page = geometry.page_size() as u64;

    // Focus moves never land on cells past the end of the file.
    let focus = |target: usize| {
        let target = target.min(last);
        if target == state.cursor {
            Navigation::Ignored
        } else {
            Navigation::Focus(target)
        }
    };
    let scroll = |window_start: u64, focus: Option<usize>| {
        if window_start == ws {
            Navigation::Ignored
        } else {
            Navigation::Scroll {
                window_start,
                focus,
            }
        }
    };

    match key {
        NavKey::PageUp => {
            if id > 0 {
                focus(0)
            } else if ws >= page {
                scroll(ws - page, None)
            } else if ws > 0 {
                scroll(0, None)
            } else {
                Navigation::Ignored
            }
        }
        NavKey::PageDown => {
            if id < max_id {
                focus(max_id)
            } else if ws + page <= max_pos {
                scroll(ws + page, None)
            } else if ws < max_pos {
                scroll(max_pos, None)
            } else {
                Navigation::Ignored
            }
        }
        NavKey::Up => {
            if geometry.in_first_row(id) && id > 0 {
                focus(id - 1)
            } else if !geometry.in_first_row(id) {
                focus(id - geometry.columns)
            } else if ws > 0 {
                scroll(ws.saturating_sub(columns), None)
            } else {
                Navigation::Ignored
            }
        }
        NavKey::Down => {
            if geometry.in_last_row(id) && id < max_id {
                focus(id + 1)
            } else if id + geometry.columns <= max_id {
                focus(id + geometry.columns)
            } else if ws + columns < file_size {
                scroll((ws + columns).min(max_pos), None)
            } else {
                Navigation::Ignored
            }
        }
        NavKey::Left => {
            if id > 0 {
                focus(id - 1)
            } else if ws > 0 {
                let window_start = ws.saturating_sub(columns);
                // Keep the cursor on the byte just before the old window.
                let cursor = (ws - 1 - window_start) as usize;
                scroll(window_start, Some(cursor))
            } else {
                Navigation::Ignored
            }
        }
        NavKey::Right => {
            if id < max_id {
                focus(id + 1)
            } else if ws + columns < file_size {
                let window_start = (ws + columns).min(max_pos);
                let cursor = (ws + page).saturating_sub(window_start) as usize;
                scroll(window_start, Some(cursor.min(max_id)))
            } else {
                Navigation::Ignored
            }
        }
    }
}

/// Computes the effect of a wheel movement. The wheel never moves the cursor.
///
/// Each event shifts the window one row, clamped to
/// `0..=max_window_start`; a shift that would not move is ignored.
///
/// # Examples
///
/// ```rust
/// use bubbletea_hexview::geometry::Geometry;
/// use bubbletea_hexview::navigation::{wheel, NavState, Navigation};
///
/// let g = Geometry::new(2);
/// let state = NavState { window_start: 960, cursor: 3 };
///
/// assert_eq!(
///     wheel(1, state, g, 1000),
///     Navigation::Scroll { window_start: 968, focus: None }
/// );
/// let bottom = NavState { window_start: 968, cursor: 3 };
/// assert_eq!(wheel(1, bottom, g, 1000), Navigation::Ignored);
/// ```
pub fn wheel(delta_y: i32, state: NavState, geometry: Geometry, file_size: u64) -> Navigation {
    let ws = state.window_start;
    let columns = geometry.columns as u64;
    let max_pos = geometry.max_window_start(file_size);

    let window_start = if delta_y < 0 {
        ws.saturating_sub(columns)
    } else if delta_y > 0 && ws < max_pos {
        (ws + columns).min(max_pos)
    } else {
        ws
    };

    if window_start == ws {
        Navigation::Ignored
    } else {
        Navigation::Scroll {
            window_start,
            focus: None,
        }
    }
}
