//! Debounced scheduling for bubbletea-rs components.
//!
//! A [`Debounce`] coalesces a burst of changes into a single callback once the
//! changes have been quiet for at least `timeout`. It runs on a fixed polling
//! tick: every `poll_interval` it checks whether a change is pending and the
//! quiet period has elapsed, and if so reports [`Poll::Fire`] exactly once.
//! New changes while waiting simply extend the wait; they never queue extra
//! invocations.
//!
//! [`IdleDebounce`] uses the same mechanism but its watched input is user
//! interaction itself (key presses, wheel movement, pointer activity), so it
//! fires only after the user has been idle for the whole period.
//!
//! # Usage
//!
//! ```rust
//! use bubbletea_hexview::debounce::{Debounce, Poll};
//! use bubbletea_rs::{Cmd, Msg};
//! use std::time::Duration;
//!
//! struct Search {
//!     debounce: Debounce,
//!     query: String,
//! }
//!
//! impl Search {
//!     fn type_char(&mut self, c: char) {
//!         self.query.push(c);
//!         self.debounce.touch();
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         match self.debounce.update(&msg) {
//!             Poll::Fire(next) => {
//!                 // run the search for self.query here
//!                 Some(next)
//!             }
//!             Poll::Waiting(next) => Some(next),
//!             Poll::Ignored => None,
//!         }
//!     }
//! }
//!
//! let mut search = Search { debounce: Debounce::new(Duration::from_millis(100)), query: String::new() };
//! let _start = search.debounce.init();
//! search.type_char('a');
//! ```

use crate::navigation::WheelMsg;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// How often a debouncer checks whether its quiet period has elapsed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Quiet period before an [`IdleDebounce`] fires.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(700);

/// Polling tick of a single debouncer.
#[derive(Debug, Clone)]
pub struct PollMsg {
    /// Id of the debouncer that scheduled this tick.
    pub id: i64,
    tag: i64,
}

/// Outcome of feeding a message to a debouncer.
pub enum Poll {
    /// The message was not this debouncer's tick.
    Ignored,
    /// Tick consumed, nothing due yet. Return the command to keep polling.
    Waiting(Cmd),
    /// The quiet period elapsed with a change pending. Run the debounced
    /// action now and return the command to keep polling.
    Fire(Cmd),
}

impl Poll {
    /// Whether the debounced action is due.
    pub fn fired(&self) -> bool {
        matches!(self, Poll::Fire(_))
    }

    /// The follow-up polling command, if the tick was consumed.
    pub fn into_cmd(self) -> Option<Cmd> {
        match self {
            Poll::Ignored => None,
            Poll::Waiting(cmd) | Poll::Fire(cmd) => Some(cmd),
        }
    }
}

/// Trailing-edge debouncer driven by a polling tick.
///
/// A new debouncer starts with a pending change so the first action runs one
/// quiet period after the component starts.
#[derive(Debug, Clone)]
pub struct Debounce {
    /// Minimum quiet period before firing.
    pub timeout: Duration,
    /// Interval of the polling tick.
    pub poll_interval: Duration,

    id: i64,
    tag: i64,
    pending: bool,
    last_reset: Instant,
}

impl Debounce {
    /// Creates a debouncer polling at [`DEFAULT_POLL_INTERVAL`].
    ///
    /// # Arguments
    ///
    /// * `timeout` - Quiet period that must pass after the last
    ///   [`touch`](Self::touch) before the debouncer fires.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::debounce::Debounce;
    /// use std::time::Duration;
    ///
    /// let fetch = Debounce::new(Duration::from_millis(100));
    /// assert!(fetch.pending());
    /// assert_eq!(fetch.poll_interval, Duration::from_millis(50));
    /// ```
    pub fn new(timeout: Duration) -> Self {
        Self::with_poll_interval(timeout, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a debouncer with an explicit polling interval.
    ///
    /// The interval bounds how late a fire can be: the action runs within
    /// one `poll_interval` after the quiet period has elapsed.
    pub fn with_poll_interval(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            id: next_id(),
            tag: 0,
            pending: true,
            last_reset: Instant::now(),
        }
    }

    /// Unique id carried by this debouncer's [`PollMsg`] ticks.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether a change is waiting for its quiet period.
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Records a change of the watched input.
    ///
    /// Each call restarts the quiet period, so a burst of touches fires once,
    /// `timeout` after the last of them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::debounce::Debounce;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut fetch = Debounce::new(Duration::from_millis(100));
    /// fetch.cancel();
    /// assert!(!fetch.pending());
    ///
    /// fetch.touch();
    /// assert!(fetch.pending());
    /// assert!(!fetch.poll_at(Instant::now()));
    /// assert!(fetch.poll_at(Instant::now() + Duration::from_millis(150)));
    /// ```
    pub fn touch(&mut self) {
        self.touch_at(Instant::now());
    }

    /// [`touch`](Self::touch) with an explicit clock reading.
    pub fn touch_at(&mut self, now: Instant) {
        self.last_reset = now;
        self.pending = true;
    }

    /// Drops a pending change without firing.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Checks the quiet period at `now`; returns true exactly once per burst.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if !self.pending || now.saturating_duration_since(self.last_reset) <= self.timeout {
            return false;
        }
        self.pending = false;
        self.last_reset = now;
        true
    }

    /// Starts (or restarts) the polling tick. Ticks from an earlier chain are
    /// rejected afterwards, so calling this twice never doubles the rate.
    pub fn init(&mut self) -> Cmd {
        self.tag += 1;
        self.tick()
    }

    /// Stops polling; the outstanding tick is dropped when it arrives.
    pub fn stop(&mut self) {
        self.tag += 1;
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.poll_interval, move |_| Box::new(PollMsg { id, tag }) as Msg)
    }

    /// Consumes this debouncer's polling tick.
    ///
    /// Messages that are not a [`PollMsg`] with this debouncer's id and
    /// current tag come back as [`Poll::Ignored`]. Otherwise the tick is
    /// rescheduled and the result tells the caller whether to run the
    /// debounced action.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::debounce::{Debounce, Poll};
    /// use bubbletea_rs::Msg;
    /// use std::time::Duration;
    ///
    /// let mut fetch = Debounce::new(Duration::from_millis(100));
    /// let _tick = fetch.init();
    ///
    /// let unrelated: Msg = Box::new("resize");
    /// assert!(matches!(fetch.update(&unrelated), Poll::Ignored));
    /// ```
    pub fn update(&mut self, msg: &Msg) -> Poll {
        let Some(poll) = msg.downcast_ref::<PollMsg>() else {
            return Poll::Ignored;
        };
        if poll.id != self.id || poll.tag != self.tag {
            return Poll::Ignored;
        }

        if self.poll_at(Instant::now()) {
            Poll::Fire(self.tick())
        } else {
            Poll::Waiting(self.tick())
        }
    }
}

/// Raw interaction kinds that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The pointer moved.
    PointerMove,
    /// A mouse button went down.
    PointerDown,
    /// A mouse button was released.
    PointerUp,
    /// The wheel turned.
    Wheel,
    /// A key went down.
    KeyDown,
    /// A key was released.
    KeyUp,
    /// A key produced input.
    KeyPress,
}

/// Reports user activity the program does not otherwise deliver as a
/// [`KeyMsg`] or [`WheelMsg`] (pointer movement, clicks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionMsg(pub Interaction);

/// Fires once the user has not interacted for `timeout`.
#[derive(Debug, Clone)]
pub struct IdleDebounce {
    inner: Debounce,
}

impl IdleDebounce {
    /// Creates an idle debouncer with the default polling interval.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::debounce::{IdleDebounce, Interaction, InteractionMsg, Poll};
    /// use bubbletea_rs::Msg;
    /// use std::time::Duration;
    ///
    /// let mut idle = IdleDebounce::new(Duration::from_millis(700));
    /// let click: Msg = Box::new(InteractionMsg(Interaction::PointerDown));
    /// assert!(matches!(idle.update(&click), Poll::Ignored));
    /// assert!(idle.pending());
    /// ```
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Debounce::new(timeout),
        }
    }

    /// Creates an idle debouncer with an explicit polling interval.
    pub fn with_poll_interval(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            inner: Debounce::with_poll_interval(timeout, poll_interval),
        }
    }

    /// Unique id carried by this debouncer's ticks.
    pub fn id(&self) -> i64 {
        self.inner.id()
    }

    /// The idle period.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Whether activity happened since the last fire.
    pub fn pending(&self) -> bool {
        self.inner.pending()
    }

    /// Whether `msg` is user activity.
    pub fn is_interaction(msg: &Msg) -> bool {
        msg.downcast_ref::<KeyMsg>().is_some()
            || msg.downcast_ref::<WheelMsg>().is_some()
            || msg.downcast_ref::<InteractionMsg>().is_some()
    }

    /// Records user activity at `now`.
    pub fn interact_at(&mut self, now: Instant) {
        self.inner.touch_at(now);
    }

    /// Checks the idle period at `now`; true once per quiet spell.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        self.inner.poll_at(now)
    }

    /// Starts the polling tick.
    pub fn init(&mut self) -> Cmd {
        self.inner.init()
    }

    /// Stops polling.
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// Interaction messages reset the idle timer and are reported as
    /// [`Poll::Ignored`] so the caller still handles them.
    pub fn update(&mut self, msg: &Msg) -> Poll {
        if Self::is_interaction(msg) {
            self.inner.touch();
            return Poll::Ignored;
        }
        self.inner.update(msg)
    }
}

impl Default for IdleDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    const T: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn unique_ids() {
        assert_ne!(Debounce::new(T).id(), Debounce::new(T).id());
    }

    #[test]
    fn starts_pending_and_fires_after_quiet_period() {
        let mut d = Debounce::new(T);
        let t0 = Instant::now();
        d.touch_at(t0);
        assert!(d.pending());
        assert!(!d.poll_at(t0 + ms(50)));
        assert!(!d.poll_at(t0 + T));
        assert!(d.poll_at(t0 + ms(101)));
        assert!(!d.pending());
        assert!(!d.poll_at(t0 + ms(500)));
    }

    #[test]
    fn burst_fires_once_after_the_last_change() {
        let mut d = Debounce::new(T);
        let t0 = Instant::now();
        let mut fired = Vec::new();
        let mut last_touch = t0;

        // Ten changes 20ms apart, polled every 10ms for a second.
        for step in 0..100u64 {
            let now = t0 + ms(step * 10);
            if step % 2 == 0 && step < 20 {
                d.touch_at(now);
                last_touch = now;
            }
            if d.poll_at(now) {
                fired.push(now);
            }
        }

        assert_eq!(fired.len(), 1);
        assert!(fired[0].duration_since(last_touch) >= T);
    }

    #[test]
    fn never_fires_while_changes_keep_arriving() {
        let mut d = Debounce::new(T);
        let t0 = Instant::now();
        for step in 0..200u64 {
            let now = t0 + ms(step * 10);
            if step % 5 == 0 {
                d.touch_at(now);
            }
            assert!(!d.poll_at(now));
        }
    }

    #[test]
    fn cancel_drops_pending_change() {
        let mut d = Debounce::new(T);
        let t0 = Instant::now();
        d.touch_at(t0);
        d.cancel();
        assert!(!d.poll_at(t0 + ms(500)));
    }

    #[test]
    fn update_ignores_foreign_messages() {
        let mut d = Debounce::new(T);
        let _ = d.init();

        let other: Msg = Box::new(PollMsg {
            id: d.id() + 1000,
            tag: d.tag,
        });
        assert!(matches!(d.update(&other), Poll::Ignored));

        let unrelated: Msg = Box::new("hello");
        assert!(matches!(d.update(&unrelated), Poll::Ignored));
    }

    #[test]
    fn restarting_rejects_the_old_tick_chain() {
        let mut d = Debounce::new(T);
        let _ = d.init();
        let old_tag = d.tag;
        let _ = d.init();

        let stale: Msg = Box::new(PollMsg {
            id: d.id(),
            tag: old_tag,
        });
        assert!(matches!(d.update(&stale), Poll::Ignored));

        let current: Msg = Box::new(PollMsg {
            id: d.id(),
            tag: d.tag,
        });
        assert!(matches!(d.update(&current), Poll::Waiting(_)));
    }

    #[test]
    fn stop_rejects_outstanding_tick() {
        let mut d = Debounce::new(T);
        let _ = d.init();
        let tag = d.tag;
        d.stop();
        let msg: Msg = Box::new(PollMsg { id: d.id(), tag });
        assert!(matches!(d.update(&msg), Poll::Ignored));
    }

    #[test]
    fn fires_through_update_once_due() {
        let mut d = Debounce::new(Duration::ZERO);
        let _ = d.init();
        d.touch_at(Instant::now() - ms(10));
        let msg: Msg = Box::new(PollMsg {
            id: d.id(),
            tag: d.tag,
        });
        let poll = d.update(&msg);
        assert!(poll.fired());
        assert!(poll.into_cmd().is_some());

        let again: Msg = Box::new(PollMsg {
            id: d.id(),
            tag: d.tag,
        });
        assert!(matches!(d.update(&again), Poll::Waiting(_)));
    }

    #[tokio::test]
    async fn init_schedules_own_poll_tick() {
        let mut d = Debounce::with_poll_interval(T, ms(1));
        let msg = d.init().await.expect("tick message");
        let poll = msg.downcast_ref::<PollMsg>().expect("poll msg");
        assert_eq!(poll.id, d.id());
    }

    #[test]
    fn idle_resets_on_every_interaction() {
        let mut idle = IdleDebounce::new(T);
        let t0 = Instant::now();
        for step in 0..100u64 {
            let now = t0 + ms(step * 10);
            if step % 8 == 0 {
                idle.interact_at(now);
            }
            assert!(!idle.poll_at(now), "fired at step {step}");
        }
        let quiet = t0 + ms(99 * 10) + ms(200);
        assert!(idle.poll_at(quiet));
    }

    #[test]
    fn idle_recognises_interaction_messages() {
        let key: Msg = Box::new(KeyMsg {
            key: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
        });
        let wheel: Msg = Box::new(WheelMsg { delta_y: 1 });
        let pointer: Msg = Box::new(InteractionMsg(Interaction::PointerMove));
        let other: Msg = Box::new(42u8);

        assert!(IdleDebounce::is_interaction(&key));
        assert!(IdleDebounce::is_interaction(&wheel));
        assert!(IdleDebounce::is_interaction(&pointer));
        assert!(!IdleDebounce::is_interaction(&other));

        let mut idle = IdleDebounce::default();
        assert_eq!(idle.timeout(), DEFAULT_IDLE_TIMEOUT);
        assert!(matches!(idle.update(&key), Poll::Ignored));
        assert!(idle.pending());
    }
}
