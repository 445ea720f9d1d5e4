//! Manual hex entry for the focused cell.
//!
//! A cell is overwritten by typing two hex digits. The first digit starts a
//! partial edit, the second completes it and yields the new byte. Anything
//! that would not form a valid hex byte is rejected before it reaches the
//! viewport.

use once_cell::sync::Lazy;
use regex::Regex;

static PARTIAL_BYTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{1,2}$").expect("partial byte pattern"));
static COMPLETE_BYTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{2}$").expect("complete byte pattern"));

/// Result of feeding one key to a [`CellEdit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// One digit entered, waiting for the second.
    Partial,
    /// Two digits entered; the cell takes this value.
    Complete(u8),
    /// The input could not extend a hex byte. Any partial edit is dropped.
    Rejected,
    /// A partial edit was cleared.
    Cleared,
}

/// In-progress hex entry for a single cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellEdit {
    digits: String,
}

impl CellEdit {
    /// Creates an editor with no edit in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// The digits typed so far, if an edit is in progress.
    pub fn pending(&self) -> Option<&str> {
        if self.digits.is_empty() {
            None
        } else {
            Some(&self.digits)
        }
    }

    /// Whether one digit has been typed and the second is awaited.
    pub fn is_editing(&self) -> bool {
        !self.digits.is_empty()
    }

    /// Whether `c` can take part in a hex byte at all.
    pub fn accepts(c: char) -> bool {
        let mut buf = [0u8; 4];
        PARTIAL_BYTE.is_match(c.encode_utf8(&mut buf))
    }

    /// Feeds one typed character.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::input::{CellEdit, EditOutcome};
    ///
    /// let mut edit = CellEdit::new();
    /// assert_eq!(edit.input('4'), EditOutcome::Partial);
    /// assert_eq!(edit.input('2'), EditOutcome::Complete(0x42));
    /// assert_eq!(edit.input('q'), EditOutcome::Rejected);
    /// ```
    pub fn input(&mut self, c: char) -> EditOutcome {
        let mut candidate = self.digits.clone();
        candidate.push(c);

        if COMPLETE_BYTE.is_match(&candidate) {
            self.digits.clear();
            return match u8::from_str_radix(&candidate, 16) {
                Ok(byte) => EditOutcome::Complete(byte),
                Err(_) => EditOutcome::Rejected,
            };
        }
        if PARTIAL_BYTE.is_match(&candidate) {
            self.digits = candidate;
            return EditOutcome::Partial;
        }
        self.digits.clear();
        EditOutcome::Rejected
    }

    /// Clears the typed digits.
    pub fn backspace(&mut self) -> EditOutcome {
        self.digits.clear();
        EditOutcome::Cleared
    }

    /// Drops any partial edit, e.g. when focus moves to another cell.
    pub fn reset(&mut self) {
        self.digits.clear();
    }
}
