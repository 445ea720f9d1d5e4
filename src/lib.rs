#![doc(html_root_url = "https://docs.rs/bubbletea-hexview/")]

//! # bubbletea-hexview
//!
//! A hex viewer component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications. It shows a sliding window over a file's bytes, moves that
//! window and a cursor cell in response to keys and the mouse wheel, and
//! pulls pages and per-offset decodes from an asynchronous [`Backend`].
//!
//! ## Overview
//!
//! The crate is built from small pieces that each follow the Elm
//! Architecture used throughout bubbletea-rs:
//!
//! - [`geometry`] maps window positions and cell ids to file offsets.
//! - [`navigation`] turns key presses and wheel deltas into cursor moves or
//!   window shifts, clamped to the file's bounds.
//! - [`debounce`] coalesces bursts of window moves into one page fetch, and
//!   restores cell focus after the user goes idle.
//! - [`viewport`] ties these together for one file; [`tabs`] keeps one
//!   viewport per open file with a single active tab.
//! - [`inspector`] shows the multi-width numeric and character decode of the
//!   focused offset.
//!
//! Backend calls never block the event loop. Each one is a [`Cmd`] whose
//! response message is tagged with the issuing component's id and a request
//! sequence number, so late responses for superseded requests are dropped.
//!
//! ## Key Bindings
//!
//! ```rust
//! use bubbletea_hexview::key::{Binding, KeyMap};
//! use bubbletea_hexview::navigation::NavigationKeyMap;
//! use crossterm::event::KeyCode;
//!
//! let keymap = NavigationKeyMap::default();
//! assert_eq!(keymap.short_help().len(), 4);
//!
//! let jump = Binding::new(vec![KeyCode::Home]).with_help("home", "first byte");
//! assert_eq!(jump.help().desc, "first byte");
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bubbletea_hexview::prelude::*;
//! use bubbletea_rs::{Cmd, Msg};
//!
//! struct App {
//!     tabs: FileTabs,
//! }
//!
//! impl App {
//!     fn new(backend: Arc<dyn Backend>) -> (Self, Cmd) {
//!         let tabs = FileTabs::new(backend, Config::default());
//!         let load = tabs.load();
//!         (Self { tabs }, load)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(note) = msg.downcast_ref::<NotificationMsg>() {
//!             eprintln!("{}: {}", note.level, note.message);
//!             return None;
//!         }
//!         self.tabs.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.tabs.view()
//!     }
//! }
//! ```

pub mod backend;
pub mod config;
pub mod debounce;
pub mod format;
pub mod geometry;
pub mod input;
pub mod inspector;
pub mod key;
pub mod navigation;
pub mod notify;
pub mod request;
pub mod tabs;
pub mod viewport;

use bubbletea_rs::Cmd;

/// Focus management shared by the components of this crate.
///
/// A focused component receives keyboard and wheel input; a blurred one
/// still processes its own responses and ticks but ignores input. For a
/// [`viewport::Model`] focus means "this is the active file tab".
///
/// ```rust
/// use std::sync::Arc;
/// use bubbletea_hexview::prelude::*;
///
/// let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
/// let mut hex = Viewport::new(0, 0, backend, Config::default());
/// assert!(!hex.focused());
///
/// hex.focus();
/// assert!(hex.focused());
///
/// hex.blur();
/// assert!(!hex.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state. May return a command to run.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred state.
    fn blur(&mut self);

    /// Returns the current focus state.
    fn focused(&self) -> bool;
}

pub use backend::{
    AppFileStateResult, Backend, BackendError, DataInPosition, FileReadResult, MemoryBackend,
    TextDataInPosition,
};
pub use config::Config;
pub use debounce::{Debounce, IdleDebounce, Interaction, InteractionMsg, Poll};
pub use format::{CharacterMode, Endian};
pub use geometry::Geometry;
pub use inspector::Inspector;
pub use key::{matches, Binding, Help as KeyHelp, KeyMap, KeyPress};
pub use navigation::{navigate, wheel, NavKey, NavState, Navigation, WheelMsg};
pub use notify::{notify, Level, NotificationMsg};
pub use tabs::FileTabs;
pub use viewport::Model as Viewport;

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_hexview::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backend::{Backend, BackendError, MemoryBackend};
    pub use crate::config::Config;
    pub use crate::debounce::{Interaction, InteractionMsg};
    pub use crate::format::{CharacterMode, Endian};
    pub use crate::key::{matches, Binding, Help as KeyHelp, KeyMap, KeyPress};
    pub use crate::navigation::WheelMsg;
    pub use crate::notify::{Level, NotificationMsg};
    pub use crate::tabs::FileTabs;
    pub use crate::viewport::Model as Viewport;
    pub use crate::Component;
}
