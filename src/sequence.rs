//! Vim-style key sequences (`g g`, `d i w`).
//!
//! Sequences are always document-scoped: the manager keeps a single
//! document keydown listener, attached with the first registration and
//! removed with the last, and advances every registration's cursor on each
//! keydown.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::defaults::DEFAULT_SEQUENCE_TIMEOUT_MS;
use crate::dom::{Dom, KeyEventType, KeyboardEvent, ListenerId, Target};
use crate::error::{HotkeyError, Result};
use crate::hotkey::{
    matches_keyboard_event, parse_hotkey, HotkeyCallback, HotkeyCallbackContext, ParsedHotkey,
    Platform,
};

pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(DEFAULT_SEQUENCE_TIMEOUT_MS);

/// Per-sequence options. Unset fields fall back to the manager's defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceOptions {
    /// Maximum gap between consecutive keys
    pub timeout: Option<Duration>,
    pub enabled: Option<bool>,
    pub prevent_default: Option<bool>,
    pub stop_propagation: Option<bool>,
    pub platform: Option<Platform>,
}

impl SequenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = Some(prevent);
        self
    }

    pub fn stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = Some(stop);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn merged_over(self, base: &SequenceOptions) -> SequenceOptions {
        SequenceOptions {
            timeout: self.timeout.or(base.timeout),
            enabled: self.enabled.or(base.enabled),
            prevent_default: self.prevent_default.or(base.prevent_default),
            stop_propagation: self.stop_propagation.or(base.stop_propagation),
            platform: self.platform.or(base.platform),
        }
    }
}

// =============================================================================
// CURSOR
// =============================================================================

/// Progress through one sequence.
#[derive(Clone, Copy, Debug, Default)]
struct SequenceCursor {
    index: usize,
    last_key_time: Option<Instant>,
}

impl SequenceCursor {
    /// Feed one keydown. Returns true when it completes the sequence; the
    /// cursor is then back at the start.
    fn advance(&mut self, event: &KeyboardEvent, sequence: &[ParsedHotkey], timeout: Duration) -> bool {
        let now = event.time_stamp();

        if self.index > 0 {
            let expired = self
                .last_key_time
                .is_some_and(|last| now.saturating_duration_since(last) > timeout);
            if expired {
                self.index = 0;
            }
        }

        let Some(expected) = sequence.get(self.index) else {
            return false;
        };

        if matches_keyboard_event(event, expected) {
            self.last_key_time = Some(now);
            self.index += 1;
            if self.index >= sequence.len() {
                self.index = 0;
                return true;
            }
        } else if self.index > 0 {
            // A fresh first key restarts instead of discarding the press.
            if matches_keyboard_event(event, &sequence[0]) {
                self.index = 1;
                self.last_key_time = Some(now);
            } else {
                self.index = 0;
            }
        }

        false
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// MANAGER
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence_{}", self.0)
    }
}

struct SequenceRegistration {
    id: SequenceId,
    hotkey: String,
    parsed_sequence: Vec<ParsedHotkey>,
    callback: HotkeyCallback,
    timeout: Duration,
    enabled: bool,
    prevent_default: bool,
    stop_propagation: bool,
    cursor: RefCell<SequenceCursor>,
}

struct SequenceInner {
    dom: Dom,
    platform: Platform,
    defaults: SequenceOptions,
    registrations: RefCell<Vec<Rc<SequenceRegistration>>>,
    listener: Cell<Option<ListenerId>>,
    next_id: Cell<u64>,
}

impl SequenceInner {
    fn is_live(&self, id: SequenceId) -> bool {
        self.registrations.borrow().iter().any(|r| r.id == id)
    }

    fn unregister(&self, id: SequenceId) {
        let now_empty = {
            let mut registrations = self.registrations.borrow_mut();
            let before = registrations.len();
            registrations.retain(|r| r.id != id);
            if registrations.len() == before {
                return;
            }
            registrations.is_empty()
        };

        debug!(sequence_id = %id, "Unregistered sequence");
        if now_empty {
            self.remove_listener();
        }
    }

    fn remove_listener(&self) {
        if let Some(listener) = self.listener.take() {
            self.dom.remove_listener(listener);
            debug!("Detached sequence listener");
        }
    }

    fn handle_key_down(&self, event: &KeyboardEvent) {
        let registrations: Vec<Rc<SequenceRegistration>> = self.registrations.borrow().clone();

        for registration in registrations {
            if !registration.enabled || !self.is_live(registration.id) {
                continue;
            }

            let completed = registration.cursor.borrow_mut().advance(
                event,
                &registration.parsed_sequence,
                registration.timeout,
            );
            if !completed {
                trace!(
                    sequence_id = %registration.id,
                    progress = registration.cursor.borrow().index,
                    "Sequence progress"
                );
                continue;
            }

            if registration.prevent_default {
                event.prevent_default();
            }
            if registration.stop_propagation {
                event.stop_propagation();
            }

            debug!(
                sequence_id = %registration.id,
                hotkey = %registration.hotkey,
                "Sequence completed"
            );

            let Some(last) = registration.parsed_sequence.last() else {
                continue;
            };
            let context = HotkeyCallbackContext {
                hotkey: registration.hotkey.clone(),
                parsed_hotkey: last.clone(),
            };
            (registration.callback)(event, &context);
        }
    }
}

impl Drop for SequenceInner {
    fn drop(&mut self) {
        self.remove_listener();
    }
}

/// Owns every sequence registration. Clones share state.
#[derive(Clone)]
pub struct SequenceManager {
    inner: Rc<SequenceInner>,
}

impl SequenceManager {
    pub fn new(dom: &Dom) -> Self {
        Self::with_settings(dom, Platform::current(), SequenceOptions::default())
    }

    pub fn with_settings(dom: &Dom, platform: Platform, defaults: SequenceOptions) -> Self {
        Self {
            inner: Rc::new(SequenceInner {
                dom: dom.clone(),
                platform,
                defaults,
                registrations: RefCell::new(Vec::new()),
                listener: Cell::new(None),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Fire `callback` once `sequence` is typed in order, each key within
    /// the timeout of the previous one.
    pub fn register<I, S, F>(&self, sequence: I, callback: F, options: SequenceOptions) -> Result<SequenceHandle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&KeyboardEvent, &HotkeyCallbackContext) + 'static,
    {
        let sequence: Vec<String> = sequence.into_iter().map(|s| s.as_ref().to_string()).collect();
        if sequence.is_empty() {
            return Err(HotkeyError::EmptySequence);
        }

        let options = options.merged_over(&self.inner.defaults);
        let platform = options.platform.unwrap_or(self.inner.platform);
        let parsed_sequence = sequence.iter().map(|h| parse_hotkey(h, platform)).collect();

        let id = SequenceId(self.inner.next_id.get() + 1);
        self.inner.next_id.set(id.0);

        let registration = SequenceRegistration {
            id,
            hotkey: sequence.join(" "),
            parsed_sequence,
            callback: Rc::new(callback),
            timeout: options.timeout.unwrap_or(DEFAULT_SEQUENCE_TIMEOUT),
            enabled: options.enabled.unwrap_or(true),
            prevent_default: options.prevent_default.unwrap_or(true),
            stop_propagation: options.stop_propagation.unwrap_or(true),
            cursor: RefCell::new(SequenceCursor::default()),
        };
        debug!(sequence_id = %id, hotkey = %registration.hotkey, "Registered sequence");

        self.inner.registrations.borrow_mut().push(Rc::new(registration));
        self.ensure_listener();

        Ok(SequenceHandle {
            id,
            manager: Rc::downgrade(&self.inner),
        })
    }

    fn ensure_listener(&self) {
        if self.inner.listener.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let listener = self
            .inner
            .dom
            .add_key_listener(Target::Document, KeyEventType::KeyDown, move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_key_down(event);
                }
            });
        self.inner.listener.set(Some(listener));
        debug!("Attached sequence listener");
    }

    /// Rewind every cursor to the start.
    pub fn reset_all(&self) {
        for registration in self.inner.registrations.borrow().iter() {
            registration.cursor.borrow_mut().reset();
        }
    }

    pub fn registration_count(&self) -> usize {
        self.inner.registrations.borrow().len()
    }

    /// Drop every registration and the listener.
    pub fn close(&self) {
        self.inner.remove_listener();
        self.inner.registrations.borrow_mut().clear();
    }
}

impl fmt::Debug for SequenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceManager")
            .field("platform", &self.inner.platform)
            .field("registrations", &self.registration_count())
            .field("listening", &self.inner.listener.get().is_some())
            .finish()
    }
}

/// Returned by [`SequenceManager::register`].
#[derive(Clone, Debug)]
pub struct SequenceHandle {
    id: SequenceId,
    manager: Weak<SequenceInner>,
}

impl SequenceHandle {
    pub fn id(&self) -> SequenceId {
        self.id
    }

    /// Idempotent.
    pub fn unregister(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.unregister(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.manager
            .upgrade()
            .is_some_and(|manager| manager.is_live(self.id))
    }
}

// =============================================================================
// STANDALONE MATCHER
// =============================================================================

/// Sequence matching without a listener; the caller feeds events.
#[derive(Clone, Debug)]
pub struct SequenceMatcher {
    parsed_sequence: Vec<ParsedHotkey>,
    timeout: Duration,
    cursor: SequenceCursor,
}

impl SequenceMatcher {
    pub fn new<I, S>(sequence: I, timeout: Option<Duration>, platform: Platform) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            parsed_sequence: sequence
                .into_iter()
                .map(|h| parse_hotkey(h.as_ref(), platform))
                .collect(),
            timeout: timeout.unwrap_or(DEFAULT_SEQUENCE_TIMEOUT),
            cursor: SequenceCursor::default(),
        }
    }

    /// Feed one keydown; true when it completes the sequence.
    pub fn matches(&mut self, event: &KeyboardEvent) -> bool {
        self.cursor
            .advance(event, &self.parsed_sequence, self.timeout)
    }

    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// Keys matched so far.
    pub fn progress(&self) -> usize {
        self.cursor.index
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
