// Unilog - core/buffer.rs
//
// Append-only buffer backing the GUI log viewer.
//
// Data append is decoupled from rendering cadence: `append` records entries
// immediately, while the viewer reveals them in batches on a fixed redraw
// interval. A flush always reveals *every* pending entry, so batching can
// delay visibility but never drop or reorder.
//
// The buffer never evicts. Unbounded growth over a session is an accepted
// limitation; bounding memory is a non-goal.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::core::model::{LogEntry, Toast};
use crate::util::constants::{
    MAX_REDRAW_INTERVAL_MS, MAX_VISIBLE_TOASTS, MIN_REDRAW_INTERVAL_MS,
};

// =============================================================================
// Scroll position
// =============================================================================

/// Viewport position of the viewer's scroll area.
///
/// `Bottom` means the user is following the tail: appends keep the viewport
/// at the (new) bottom. `Pinned` means the user scrolled up to read history:
/// appends leave the recorded offset untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollPos {
    Bottom,
    Pinned(f32),
}

impl ScrollPos {
    /// True when the viewport is at the logical bottom.
    pub fn is_bottom(&self) -> bool {
        matches!(self, ScrollPos::Bottom)
    }
}

// =============================================================================
// Viewer state
// =============================================================================

/// Everything the viewer renders from: the entry sequence, the flush
/// watermark, the redraw cadence, the scroll position, and pending toasts.
///
/// One instance exists per GUI session, shared through a [`ViewerHandle`].
#[derive(Debug)]
pub struct ViewerState {
    /// All entries, strictly in arrival order.
    entries: Vec<LogEntry>,

    /// How many leading entries are currently revealed to the renderer.
    /// `entries[rendered_len..]` are appended-but-not-yet-rendered.
    rendered_len: usize,

    /// Minimum time between visual flushes.
    redraw_interval: Duration,

    /// When the last flush happened. `None` until the first flush.
    last_flush: Option<Instant>,

    /// Current viewport position.
    scroll: ScrollPos,

    /// Toasts not yet expired.
    toasts: Vec<Toast>,
}

impl ViewerState {
    pub fn new(redraw_interval: Duration) -> Self {
        Self {
            entries: Vec::new(),
            rendered_len: 0,
            redraw_interval,
            last_flush: None,
            scroll: ScrollPos::Bottom,
            toasts: Vec::new(),
        }
    }

    /// Append an entry. Arrival order is preserved; the viewport stays at
    /// the bottom only if it already was there.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
        // ScrollPos::Bottom tracks the *logical* bottom, so an append moves
        // a following viewport to the new bottom by construction; a pinned
        // offset is left untouched.
    }

    /// Total number of buffered entries (rendered or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries currently revealed to the renderer.
    pub fn visible(&self) -> &[LogEntry] {
        &self.entries[..self.rendered_len]
    }

    /// Number of appended-but-not-yet-rendered entries.
    pub fn pending(&self) -> usize {
        self.entries.len() - self.rendered_len
    }

    /// True when the redraw interval has elapsed since the last flush (or
    /// no flush has happened yet) and there is something pending.
    pub fn flush_due(&self, now: Instant) -> bool {
        if self.pending() == 0 {
            return false;
        }
        match self.last_flush {
            None => true,
            Some(at) => now.duration_since(at) >= self.redraw_interval,
        }
    }

    /// Reveal every pending entry. Returns the number revealed.
    pub fn flush(&mut self, now: Instant) -> usize {
        let revealed = self.pending();
        self.rendered_len = self.entries.len();
        self.last_flush = Some(now);
        revealed
    }

    /// Change the redraw cadence, clamped to the supported range.
    pub fn set_redraw_interval(&mut self, interval: Duration) {
        let ms = interval.as_millis() as u64;
        let clamped = ms.clamp(MIN_REDRAW_INTERVAL_MS, MAX_REDRAW_INTERVAL_MS);
        self.redraw_interval = Duration::from_millis(clamped);
    }

    pub fn redraw_interval(&self) -> Duration {
        self.redraw_interval
    }

    /// Record the viewport position observed by the renderer this frame.
    pub fn note_scroll(&mut self, at_bottom: bool, offset: f32) {
        self.scroll = if at_bottom {
            ScrollPos::Bottom
        } else {
            ScrollPos::Pinned(offset)
        };
    }

    pub fn scroll(&self) -> ScrollPos {
        self.scroll
    }

    /// Queue a toast. When the stack is full the oldest toast is dismissed
    /// early to make room.
    pub fn push_toast(&mut self, toast: Toast) {
        if self.toasts.len() >= MAX_VISIBLE_TOASTS {
            self.toasts.remove(0);
        }
        self.toasts.push(toast);
    }

    /// Drop expired toasts.
    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.duration_since(t.raised_at) < t.duration);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

// =============================================================================
// Shared handle
// =============================================================================

/// Cloneable handle to the viewer state.
///
/// All rendering happens on the GUI thread; callers on other threads marshal
/// their appends through this handle rather than touching the event loop.
#[derive(Clone)]
pub struct ViewerHandle {
    inner: Arc<Mutex<ViewerState>>,
}

impl ViewerHandle {
    pub fn new(redraw_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewerState::new(redraw_interval))),
        }
    }

    /// Lock the underlying state for the duration of the guard.
    ///
    /// A poisoned lock is recovered: the buffer holds plain data and stays
    /// usable even if a renderer panicked mid-frame.
    pub fn lock(&self) -> MutexGuard<'_, ViewerState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn append(&self, entry: LogEntry) {
        self.lock().append(entry);
    }

    pub fn push_toast(&self, toast: Toast) {
        self.lock().push_toast(toast);
    }

    pub fn set_redraw_interval(&self, interval: Duration) {
        self.lock().set_redraw_interval(interval);
    }
}
