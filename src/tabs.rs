//! One hex viewport per open file.
//!
//! [`FileTabs`] mirrors the backend's list of open files. Each file gets its
//! own [`viewport::Model`](crate::viewport::Model) sized by the file's
//! length, and exactly one of them is focused at a time: only the focused
//! viewport sees key presses and wheel movement. Responses and ticks are
//! routed to whichever viewport issued them, so background tabs still finish
//! their loads.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bubbletea_rs::{batch, Cmd, KeyMsg, Msg};
use lipgloss_extras::prelude::*;

use crate::backend::{AppFileStateResult, Backend, BackendError, FileReadResult};
use crate::config::Config;
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::notify::{notify, Level};
use crate::viewport;
use crate::Component;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Response to [`FileTabs::load`].
#[derive(Debug, Clone)]
pub struct OpenFilesMsg {
    /// Id of the [`FileTabs`] that asked.
    pub id: i64,
    /// The open files, or why listing failed.
    pub result: Result<Vec<AppFileStateResult>, BackendError>,
}

/// Response to [`FileTabs::open_file`].
#[derive(Debug, Clone)]
pub struct FileOpenedMsg {
    /// Id of the [`FileTabs`] that asked.
    pub id: i64,
    /// Name passed to [`FileTabs::open_file`].
    pub file_name: String,
    /// Index of the opened file, or why opening failed.
    pub result: Result<usize, BackendError>,
}

/// First page of a newly listed file, read at the backend's remembered
/// position.
#[derive(Debug, Clone)]
pub struct SeedMsg {
    /// Id of the [`FileTabs`] that asked.
    pub id: i64,
    /// File the page belongs to.
    pub file_index: usize,
    /// The page, or why the read failed.
    pub result: Result<FileReadResult, BackendError>,
}

/// Key bindings for switching and closing tabs.
#[derive(Debug, Clone)]
pub struct TabsKeyMap {
    /// Focuses the next tab, wrapping around.
    pub next: key::Binding,
    /// Focuses the previous tab, wrapping around.
    pub prev: key::Binding,
    /// Closes the active tab.
    pub close: key::Binding,
}

impl Default for TabsKeyMap {
    fn default() -> Self {
        Self {
            next: key::Binding::new(vec!["tab"]).with_help("tab", "next file"),
            prev: key::Binding::new(vec!["shift+tab"]).with_help("shift+tab", "previous file"),
            close: key::Binding::new(vec!["ctrl+w"]).with_help("ctrl+w", "close file"),
        }
    }
}

impl KeyMapTrait for TabsKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.next, &self.close]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.next, &self.prev, &self.close]]
    }
}

/// Visual styling of the tab bar.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Label of the focused tab.
    pub active_tab: Style,
    /// Labels of background tabs.
    pub inactive_tab: Style,
    /// Placeholder shown when no file is open.
    pub empty: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            active_tab: Style::new().bold(true).reverse(true),
            inactive_tab: Style::new().faint(true),
            empty: Style::new().faint(true),
        }
    }
}

/// An open file and its viewport.
pub struct Tab {
    /// The backend's description of the file.
    pub file: AppFileStateResult,
    /// The hex viewport showing it.
    pub viewport: viewport::Model,
}

/// One hex viewport per open file, with a single active tab.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use bubbletea_hexview::backend::MemoryBackend;
/// use bubbletea_hexview::config::Config;
/// use bubbletea_hexview::tabs::FileTabs;
///
/// # async fn run() {
/// let backend = Arc::new(MemoryBackend::new());
/// backend.open_bytes("/tmp/a.bin", vec![0u8; 64]).await;
///
/// let mut tabs = FileTabs::new(backend, Config::default());
/// let listed = tabs.load().await.unwrap();
/// let _start = tabs.update(listed);
///
/// assert_eq!(tabs.tabs().len(), 1);
/// assert_eq!(tabs.active_index(), Some(0));
/// # }
/// ```
pub struct FileTabs {
    id: i64,
    backend: Arc<dyn Backend>,
    config: Config,
    tabs: Vec<Tab>,
    active: usize,
    closed: HashSet<usize>,
    select_on_load: Option<usize>,

    /// Tab switching key bindings.
    pub keymap: TabsKeyMap,
    /// Visual styling of the tab bar.
    pub styles: Styles,
}

impl FileTabs {
    /// Creates an empty tab set. Call [`load`](Self::load) to list the
    /// backend's open files.
    ///
    /// # Arguments
    ///
    /// * `backend` - Shared by every viewport and inspector.
    /// * `config` - Applied to every viewport created later.
    pub fn new(backend: Arc<dyn Backend>, config: Config) -> Self {
        Self {
            id: next_id(),
            backend,
            config,
            tabs: Vec::new(),
            active: 0,
            closed: HashSet::new(),
            select_on_load: None,
            keymap: TabsKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Unique id carried by this tab set's responses.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The open tabs in backend order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Index of the focused tab, `None` when nothing is open.
    pub fn active_index(&self) -> Option<usize> {
        if self.tabs.is_empty() {
            None
        } else {
            Some(self.active)
        }
    }

    /// The focused viewport.
    pub fn active(&self) -> Option<&viewport::Model> {
        self.tabs.get(self.active).map(|tab| &tab.viewport)
    }

    /// The focused viewport, mutably.
    pub fn active_mut(&mut self) -> Option<&mut viewport::Model> {
        self.tabs.get_mut(self.active).map(|tab| &mut tab.viewport)
    }

    /// Lists the backend's open files.
    ///
    /// Feeding the resulting [`OpenFilesMsg`] to [`update`](Self::update)
    /// creates a viewport for every file not yet shown, starts its ticks and
    /// seeds its first page. Files closed with Ctrl+W stay closed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use bubbletea_hexview::backend::MemoryBackend;
    /// use bubbletea_hexview::config::Config;
    /// use bubbletea_hexview::tabs::{FileTabs, OpenFilesMsg};
    ///
    /// # async fn run() {
    /// let backend = Arc::new(MemoryBackend::new());
    /// backend.open_bytes("/tmp/a.bin", vec![1, 2, 3]).await;
    /// let tabs = FileTabs::new(backend, Config::default());
    ///
    /// let msg = tabs.load().await.unwrap();
    /// let listed = msg.downcast_ref::<OpenFilesMsg>().unwrap();
    /// assert_eq!(listed.result.as_ref().unwrap()[0].file_name_no_path, "a.bin");
    /// # }
    /// ```
    pub fn load(&self) -> Cmd {
        let id = self.id;
        let backend = Arc::clone(&self.backend);
        Box::pin(async move {
            let result = backend.get_open_files().await;
            Some(Box::new(OpenFilesMsg { id, result }) as Msg)
        })
    }

    /// Opens a file and shows it once the list has been reloaded.
    pub fn open_file(&self, file_name: impl Into<String>, rw: bool) -> Cmd {
        let id = self.id;
        let file_name = file_name.into();
        let backend = Arc::clone(&self.backend);
        Box::pin(async move {
            let result = backend.open_file(&file_name, rw).await;
            Some(Box::new(FileOpenedMsg {
                id,
                file_name,
                result,
            }) as Msg)
        })
    }

    /// Reads the first page of `file_index` from the backend's remembered
    /// position.
    pub fn seed(&self, file_index: usize) -> Cmd {
        let id = self.id;
        let backend = Arc::clone(&self.backend);
        Box::pin(async move {
            let result = backend.read_file_current_pos(file_index).await;
            Some(Box::new(SeedMsg {
                id,
                file_index,
                result,
            }) as Msg)
        })
    }

    /// Focuses the tab at `index` and blurs every other one.
    pub fn select(&mut self, index: usize) {
        if index >= self.tabs.len() {
            return;
        }
        self.active = index;
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            if i == index {
                tab.viewport.focus();
            } else {
                tab.viewport.blur();
            }
        }
    }

    /// Focuses the next tab, wrapping to the first.
    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.select((self.active + 1) % self.tabs.len());
        }
    }

    /// Focuses the previous tab, wrapping to the last.
    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.select((self.active + self.tabs.len() - 1) % self.tabs.len());
        }
    }

    /// Drops the active tab. Its outstanding responses are discarded on
    /// arrival and it stops receiving input.
    pub fn close_active(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        let tab = self.tabs.remove(self.active);
        self.closed.insert(tab.file.file_index);
        tracing::debug!(
            target = "hexview.tabs",
            file_index = tab.file.file_index,
            "closed tab"
        );
        if !self.tabs.is_empty() {
            self.select(self.active.min(self.tabs.len() - 1));
        } else {
            self.active = 0;
        }
    }

    fn apply_open_files(&mut self, files: Vec<AppFileStateResult>) -> Option<Cmd> {
        let mut cmds = Vec::new();
        for file in files {
            if self.closed.contains(&file.file_index)
                || self
                    .tabs
                    .iter()
                    .any(|tab| tab.file.file_index == file.file_index)
            {
                continue;
            }
            let mut viewport = viewport::Model::new(
                file.file_index,
                file.file_size,
                Arc::clone(&self.backend),
                self.config.clone(),
            );
            cmds.push(viewport.init());
            cmds.push(self.seed(file.file_index));
            tracing::debug!(
                target = "hexview.tabs",
                file_index = file.file_index,
                file_size = file.file_size,
                "new tab"
            );
            self.tabs.push(Tab { file, viewport });
        }

        let target = self
            .select_on_load
            .take()
            .and_then(|index| self.tabs.iter().position(|t| t.file.file_index == index))
            .unwrap_or(self.active);
        self.select(target);

        if cmds.is_empty() {
            None
        } else {
            Some(batch(cmds))
        }
    }

    fn route(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tab) = self.tabs.iter_mut().find(|tab| tab.viewport.owns(&msg)) {
            return tab.viewport.update(msg);
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.next.matches(key_msg) {
                self.next_tab();
                return None;
            }
            if self.keymap.prev.matches(key_msg) {
                self.prev_tab();
                return None;
            }
            if self.keymap.close.matches(key_msg) {
                self.close_active();
                return None;
            }
        }
        self.active_mut().and_then(|viewport| viewport.update(msg))
    }

    /// Processes one message.
    ///
    /// File list, open and seed responses are handled here. Responses and
    /// ticks owned by a viewport go to that viewport whether or not it is
    /// active. Tab keys switch or close tabs, and any other input goes to the
    /// active viewport.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<OpenFilesMsg>() {
            Ok(open) if open.id == self.id => {
                return match open.result {
                    Ok(files) => self.apply_open_files(files),
                    Err(err) => {
                        tracing::warn!(target = "hexview.tabs", error = %err, "listing open files failed");
                        Some(notify(Level::Error, format!("Failed to list open files: {err}")))
                    }
                };
            }
            Ok(_) => return None,
            Err(other) => other,
        };
        let msg = match msg.downcast::<FileOpenedMsg>() {
            Ok(opened) if opened.id == self.id => {
                return match opened.result {
                    Ok(file_index) => {
                        self.select_on_load = Some(file_index);
                        Some(self.load())
                    }
                    Err(err) => {
                        tracing::warn!(
                            target = "hexview.tabs",
                            file_name = %opened.file_name,
                            error = %err,
                            "open failed"
                        );
                        Some(notify(
                            Level::Error,
                            format!("Failed to open {}: {err}", opened.file_name),
                        ))
                    }
                };
            }
            Ok(_) => return None,
            Err(other) => other,
        };
        let msg = match msg.downcast::<SeedMsg>() {
            Ok(seed) if seed.id == self.id => {
                let SeedMsg {
                    file_index, result, ..
                } = *seed;
                return match result {
                    Ok(page) => self
                        .tabs
                        .iter_mut()
                        .find(|tab| tab.file.file_index == file_index)
                        .and_then(|tab| tab.viewport.seed(&page)),
                    Err(err) => {
                        tracing::warn!(
                            target = "hexview.tabs",
                            file_index,
                            error = %err,
                            "initial read failed"
                        );
                        Some(notify(Level::Error, format!("Failed to read file: {err}")))
                    }
                };
            }
            Ok(_) => return None,
            Err(other) => other,
        };
        self.route(msg)
    }

    /// Renders the tab bar above the active viewport.
    pub fn view(&self) -> String {
        if self.tabs.is_empty() {
            return self.styles.empty.render("No open files");
        }
        let bar = self
            .tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let label = format!(" {} ", tab.file.file_name_no_path);
                if i == self.active {
                    self.styles.active_tab.render(&label)
                } else {
                    self.styles.inactive_tab.render(&label)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        match self.active() {
            Some(viewport) => format!("{bar}\n\n{}", viewport.view()),
            None => bar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::navigation::WheelMsg;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers,
        })
    }

    async fn two_files() -> (Arc<MemoryBackend>, FileTabs) {
        let backend = Arc::new(
            MemoryBackend::new().with_file("/data/other.bin", vec![9u8; 300]),
        );
        backend.open_bytes("/data/first.bin", vec![1u8; 100]).await;
        backend.open_bytes("/data/second.bin", vec![2u8; 2000]).await;
        let mut tabs = FileTabs::new(backend.clone(), Config::new().with_rows(2));
        let msg = tabs.load().await.expect("open files");
        assert!(tabs.update(msg).is_some());
        (backend, tabs)
    }

    fn focused(tabs: &FileTabs) -> Vec<bool> {
        tabs.tabs().iter().map(|t| t.viewport.focused()).collect()
    }

    #[tokio::test]
    async fn one_viewport_per_file_with_one_focused() {
        let (_backend, tabs) = two_files().await;
        assert_eq!(tabs.tabs().len(), 2);
        assert_eq!(tabs.tabs()[1].viewport.file_size(), 2000);
        assert_eq!(tabs.active_index(), Some(0));
        assert_eq!(focused(&tabs), vec![true, false]);
        assert!(tabs.view().contains("first.bin"));
    }

    #[tokio::test]
    async fn tab_keys_switch_focus() {
        let (_backend, mut tabs) = two_files().await;
        tabs.update(key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(focused(&tabs), vec![false, true]);
        tabs.update(key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(tabs.active_index(), Some(0));
        tabs.update(key(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(tabs.active_index(), Some(1));
    }

    #[tokio::test]
    async fn input_reaches_only_the_active_viewport() {
        let (_backend, mut tabs) = two_files().await;
        tabs.update(key(KeyCode::Tab, KeyModifiers::NONE));
        tabs.update(key(KeyCode::Right, KeyModifiers::NONE));
        tabs.update(Box::new(WheelMsg { delta_y: 1 }));

        assert_eq!(tabs.tabs()[0].viewport.cursor(), 0);
        assert_eq!(tabs.tabs()[1].viewport.cursor(), 1);
        assert_eq!(tabs.tabs()[1].viewport.window_start(), 16);
    }

    #[tokio::test]
    async fn responses_reach_background_tabs() {
        let (_backend, mut tabs) = two_files().await;
        let cmd = tabs.tabs[1].viewport.fetch_page();
        let msg = cmd.await.expect("page");
        tabs.update(msg);
        assert_eq!(tabs.tabs()[1].viewport.page_start(), Some(0));
        assert_eq!(tabs.tabs()[1].viewport.page()[0], 2);
        assert_eq!(tabs.tabs()[0].viewport.page_start(), None);
    }

    #[tokio::test]
    async fn close_drops_viewport_and_survives_reload() {
        let (_backend, mut tabs) = two_files().await;
        tabs.update(key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(tabs.tabs().len(), 1);
        assert_eq!(tabs.tabs()[0].file.file_name_no_path, "second.bin");
        assert_eq!(focused(&tabs), vec![true]);

        let msg = tabs.load().await.expect("open files");
        tabs.update(msg);
        assert_eq!(tabs.tabs().len(), 1);

        tabs.update(key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(tabs.active_index(), None);
        assert!(tabs.view().contains("No open files"));
    }

    #[tokio::test]
    async fn opening_a_file_selects_its_tab() {
        let (_backend, mut tabs) = two_files().await;
        let opened = tabs.open_file("/data/other.bin", false).await.expect("opened");
        let reload = tabs.update(opened).expect("reload");
        let list = reload.await.expect("open files");
        tabs.update(list);

        assert_eq!(tabs.tabs().len(), 3);
        assert_eq!(tabs.active_index(), Some(2));
        assert_eq!(focused(&tabs), vec![false, false, true]);
    }

    #[tokio::test]
    async fn failed_open_notifies() {
        let (_backend, mut tabs) = two_files().await;
        let opened = tabs.open_file("/missing", false).await.expect("opened");
        let cmd = tabs.update(opened).expect("notification");
        let note = cmd.await.expect("message");
        assert!(note.downcast_ref::<crate::notify::NotificationMsg>().is_some());
        assert_eq!(tabs.tabs().len(), 2);
    }

    #[tokio::test]
    async fn seed_fills_first_page() {
        let (backend, mut tabs) = two_files().await;
        let msg = tabs.seed(1).await.expect("seed");
        let text = tabs.update(msg).expect("text refresh");
        assert_eq!(tabs.tabs()[1].viewport.page().len(), 32);

        let text_msg = text.await.expect("text");
        assert!(tabs.update(text_msg).is_none());
        let inspector = tabs.tabs()[1].viewport.inspector();
        assert_eq!(inspector.text_start(), Some(0));
        assert_eq!(inspector.text_cell(0), Some('.'));

        backend.set_fail_reads(true).await;
        let msg = tabs.seed(0).await.expect("seed");
        assert!(tabs.update(msg).is_some());
    }
}
