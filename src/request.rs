//! Sequence numbers for backend requests.
//!
//! Backend calls are never cancelled and may resolve out of order. Every
//! request is tagged with a per-kind sequence number; a response is applied
//! only if no newer request of the same kind has been issued since.

/// The independent streams of backend requests a hex view issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// A page of bytes for the current window.
    Page,
    /// The multi-format decode of the focused offset.
    Position,
    /// The text decode of the last page read.
    Text,
}

impl RequestKind {
    fn index(self) -> usize {
        match self {
            RequestKind::Page => 0,
            RequestKind::Position => 1,
            RequestKind::Text => 2,
        }
    }
}

/// Tracks the latest issued sequence number per request kind.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: [u64; 3],
}

impl RequestTracker {
    /// Creates a tracker with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next sequence number for `kind`.
    pub fn issue(&mut self, kind: RequestKind) -> u64 {
        let slot = &mut self.latest[kind.index()];
        *slot += 1;
        *slot
    }

    /// The most recently issued sequence number, 0 if none.
    pub fn latest(&self, kind: RequestKind) -> u64 {
        self.latest[kind.index()]
    }

    /// Whether a response for `seq` is still the newest of its kind.
    pub fn is_current(&self, kind: RequestKind, seq: u64) -> bool {
        seq != 0 && seq == self.latest(kind)
    }
}
