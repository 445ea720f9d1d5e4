//! Type-safe key bindings for the hex view components.
//!
//! A [`Binding`] groups one or more [`KeyPress`]es with help text. Keymaps are
//! plain structs of bindings that implement [`KeyMap`] so a help view can list
//! them.
//!
//! ```rust
//! use bubbletea_hexview::key::Binding;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let close = Binding::new(vec!["ctrl+w"]).with_help("ctrl+w", "close tab");
//! let msg = KeyMsg { key: KeyCode::Char('w'), modifiers: KeyModifiers::CONTROL };
//! assert!(close.matches(&msg));
//! ```

use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Modifier keys that must be held.
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    /// Creates a key press from a code and modifiers.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    fn normalized(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
        // Terminals report SHIFT alongside upper-case characters and BackTab.
        match code {
            KeyCode::Char(_) | KeyCode::BackTab => (code, modifiers.difference(KeyModifiers::SHIFT)),
            _ => (code, modifiers),
        }
    }

    /// Returns true when the given key message is this key press.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        Self::normalized(self.code, self.modifiers) == Self::normalized(msg.key, msg.modifiers)
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self::new(code, modifiers)
    }
}

impl From<&str> for KeyPress {
    /// Parses descriptions such as `"pgup"`, `"ctrl+w"` or `"shift+tab"`.
    ///
    /// Unknown names parse to `KeyCode::Null`, which never matches.
    fn from(s: &str) -> Self {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s;
        loop {
            if let Some(r) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("shift+") {
                modifiers |= KeyModifiers::SHIFT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "pgup" => KeyCode::PageUp,
            "pgdown" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => KeyCode::Null,
                }
            }
        };

        Self::new(code, modifiers)
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, e.g. `"pgup"`.
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    enabled: bool,
}

impl Binding {
    /// Creates an enabled binding for the given keys.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            enabled: true,
        }
    }

    /// Attaches help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The key presses that trigger this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Help text for this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding currently matches anything.
    pub fn enabled(&self) -> bool {
        self.enabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true when the binding is enabled and one of its keys matches.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Implemented by component keymaps so help views can render them.
pub trait KeyMap {
    /// Bindings for the compact one-line help.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped in columns for the expanded help.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Returns true when the message is a key press matching any of the bindings.
pub fn matches(msg: &Msg, bindings: &[&Binding]) -> bool {
    msg.downcast_ref::<KeyMsg>()
        .map(|key| bindings.iter().any(|b| b.matches(key)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn parses_named_keys() {
        assert_eq!(KeyPress::from("pgup").code, KeyCode::PageUp);
        assert_eq!(KeyPress::from("pgdown").code, KeyCode::PageDown);
        assert_eq!(KeyPress::from("shift+tab").code, KeyCode::BackTab);
        assert_eq!(
            KeyPress::from("ctrl+w"),
            KeyPress::new(KeyCode::Char('w'), KeyModifiers::CONTROL)
        );
        assert_eq!(KeyPress::from("bogus").code, KeyCode::Null);
    }

    #[test]
    fn modifiers_must_match() {
        let b = Binding::new(vec!["ctrl+w"]);
        assert!(b.matches(&key(KeyCode::Char('w'), KeyModifiers::CONTROL)));
        assert!(!b.matches(&key(KeyCode::Char('w'), KeyModifiers::NONE)));
    }

    #[test]
    fn shift_is_ignored_for_characters_and_backtab() {
        let b = Binding::new(vec!["A"]);
        assert!(b.matches(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)));

        let back = Binding::new(vec!["shift+tab"]);
        assert!(back.matches(&key(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(back.matches(&key(KeyCode::BackTab, KeyModifiers::NONE)));
    }

    #[test]
    fn disabled_binding_never_matches() {
        let mut b = Binding::new(vec![KeyCode::PageUp]).with_help("pgup", "page up");
        b.set_enabled(false);
        assert!(!b.matches(&key(KeyCode::PageUp, KeyModifiers::NONE)));
        assert_eq!(b.help().desc, "page up");
    }

    #[test]
    fn matches_downcasts_messages() {
        let b = Binding::new(vec![KeyCode::Up]);
        let msg: Msg = Box::new(key(KeyCode::Up, KeyModifiers::NONE));
        assert!(matches(&msg, &[&b]));
        let other: Msg = Box::new(42u32);
        assert!(!matches(&other, &[&b]));
    }
}
