#![forbid(unsafe_code)]

//! Type-ahead search over a flat sequence.
//!
//! Typing characters in quick succession builds a prefix; the selection jumps
//! to the next row whose label starts with it. After a quiet period
//! ([`DEFAULT_IDLE_TIMEOUT`](crate::timer::DEFAULT_IDLE_TIMEOUT) by default)
//! the session ends and the next character starts a fresh prefix.
//!
//! Repeating the last typed character cycles through rows that match the
//! prefix typed so far: with rows `Apple, Banana, Avocado`, typing `a` then
//! `a` again moves from `Avocado` to `Apple` instead of failing on `aa`.
//!
//! The session never touches the tree. It reads rows and moves the selection
//! through a [`SearchHost`].

use crate::timer::IdleTimer;
use canopy_text::CaseMode;
use canopy_text::prefix;
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;
use web_time::Instant;

/// The sequence a [`TextSearch`] runs against.
pub trait SearchHost {
    /// Number of rows.
    fn item_count(&self) -> usize;

    /// Label of row `index`; `None` for rows without text, which never match.
    fn display_text(&self, index: usize) -> Option<Cow<'_, str>>;

    /// Currently selected row.
    fn selected_index(&self) -> Option<usize>;

    /// Make row `index` the selection.
    fn select(&mut self, index: usize);
}

/// Incremental search state: idle, or active with a prefix and history.
#[derive(Debug, Clone)]
pub struct TextSearch {
    case: CaseMode,
    timer: IdleTimer,
    /// `Some` while a session is active.
    last_match: Option<usize>,
    prefix: String,
    /// Consumed inputs, most recent last.
    history: Vec<String>,
}

impl Default for TextSearch {
    fn default() -> Self {
        Self::new(CaseMode::Insensitive, crate::timer::DEFAULT_IDLE_TIMEOUT)
    }
}

impl TextSearch {
    /// An idle session.
    #[must_use]
    pub fn new(case: CaseMode, idle_timeout: Duration) -> Self {
        Self {
            case,
            timer: IdleTimer::new(idle_timeout),
            last_match: None,
            prefix: String::new(),
            history: Vec::with_capacity(8),
        }
    }

    /// Case handling for matches.
    #[must_use]
    pub const fn case_mode(&self) -> CaseMode {
        self.case
    }

    /// Change case handling. Takes effect on the next character.
    pub fn set_case_mode(&mut self, case: CaseMode) {
        self.case = case;
    }

    /// Change the quiet period.
    pub fn set_idle_timeout(&mut self, timeout: Duration) {
        self.timer.set_timeout(timeout);
    }

    /// Whether a session is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.last_match.is_some()
    }

    /// Prefix matched so far.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Row of the last match while active.
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Pending idle deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// End the session.
    pub fn reset(&mut self) {
        self.last_match = None;
        self.prefix.clear();
        self.history.clear();
        self.timer.cancel();
    }

    /// End the session if its idle deadline passed. Returns `true` when it
    /// did.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            debug!(message = "search.timeout", prefix = %self.prefix);
            self.reset();
            true
        } else {
            false
        }
    }

    /// The selection moved to `index` by other means. Ends the session unless
    /// `index` is the row the search itself selected.
    pub fn invalidate_for_selection(&mut self, index: Option<usize>) {
        if self.is_active() && index != self.last_match {
            self.reset();
        }
    }

    /// Feed one input (usually one character) at `now`.
    ///
    /// Returns whether a row matched. Empty input or an empty host never
    /// matches.
    pub fn on_text<H: SearchHost + ?Sized>(&mut self, host: &mut H, text: &str, now: Instant) -> bool {
        self.poll(now);
        let start = match self.last_match {
            Some(last) => last,
            None => host.selected_index().unwrap_or(0),
        };
        let look_backward = self
            .history
            .last()
            .is_some_and(|last| prefix::eq(last, text, CaseMode::Insensitive));

        let mut needle = String::with_capacity(self.prefix.len() + text.len());
        needle.push_str(&self.prefix);
        needle.push_str(text);

        let Some(found) = self.index_of_match(host, &needle, start, look_backward) else {
            debug!(message = "search.miss", needle = %needle);
            if self.is_active() {
                self.timer.reset(now);
            }
            return false;
        };

        if !self.is_active() || found.index != start {
            host.select(found.index);
        }
        self.last_match = Some(found.index);
        if found.consumed {
            self.prefix = needle;
            self.history.push(text.to_owned());
        }
        self.timer.reset(now);
        debug!(
            message = "search.match",
            index = found.index as u64,
            consumed = found.consumed,
            prefix = %self.prefix
        );
        true
    }

    /// [`on_text`](Self::on_text) for a single character.
    pub fn on_char<H: SearchHost + ?Sized>(&mut self, host: &mut H, ch: char, now: Instant) -> bool {
        let mut buf = [0u8; 4];
        self.on_text(host, ch.encode_utf8(&mut buf), now)
    }

    /// Undo the last consumed input. Returns `false` when idle or nothing
    /// was consumed.
    pub fn on_backspace(&mut self, now: Instant) -> bool {
        self.poll(now);
        if !self.is_active() {
            return false;
        }
        let Some(last) = self.history.pop() else {
            return false;
        };
        let keep = self.prefix.len().saturating_sub(last.len());
        self.prefix.truncate(keep);
        self.timer.reset(now);
        true
    }

    /// One circular pass starting at `start`.
    fn index_of_match<H: SearchHost + ?Sized>(
        &self,
        host: &H,
        needle: &str,
        start: usize,
        look_backward: bool,
    ) -> Option<Match> {
        let count = host.item_count();
        if count == 0 || needle.is_empty() {
            return None;
        }
        let start = start.min(count - 1);
        let mut fallback = None;
        let mut fallback_armed = false;
        let mut i = start;
        loop {
            if let Some(text) = host.display_text(i) {
                if prefix::starts_with(&text, needle, self.case) {
                    return Some(Match { index: i, consumed: true });
                }
                if look_backward {
                    if fallback_armed && !self.prefix.is_empty() {
                        if fallback.is_none() && prefix::starts_with(&text, &self.prefix, self.case) {
                            fallback = Some(i);
                        }
                    } else {
                        fallback_armed = true;
                    }
                }
            }
            i = if i + 1 >= count { 0 } else { i + 1 };
            if i == start {
                break;
            }
        }
        fallback.map(|index| Match { index, consumed: false })
    }
}

#[derive(Debug, Clone, Copy)]
struct Match {
    index: usize,
    consumed: bool,
}
