//! Captures the next key combination the user presses.
//!
//! `idle -> recording -> idle`. While recording, every keydown is swallowed
//! in the window capture phase, before any hotkey listener sees it:
//! Escape cancels, a bare Backspace/Delete clears, modifier-only presses
//! update the live preview, and anything with an action key completes the
//! recording with a `Mod`-form descriptor.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

use crate::dom::{Dom, KeyEventType, KeyboardEvent, ListenerId, Target};
use crate::hotkey::{
    convert_to_mod_format, descriptor_has_non_modifier_key, is_modifier_key_name,
    keyboard_event_to_hotkey, normalize_key_name, CanonicalModifier, ParsedHotkey, Platform,
};
use crate::store::Store;

pub type RecordCallback = Rc<dyn Fn(&str)>;
pub type RecorderCallback = Rc<dyn Fn()>;

/// Callbacks and platform for a recorder. Unset callbacks are skipped.
#[derive(Clone, Default)]
pub struct HotkeyRecorderOptions {
    pub on_record: Option<RecordCallback>,
    pub on_cancel: Option<RecorderCallback>,
    pub on_clear: Option<RecorderCallback>,
    /// Decides which modifier becomes `Mod` (default: detected)
    pub platform: Option<Platform>,
}

impl HotkeyRecorderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_record(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_record = Some(Rc::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_cancel = Some(Rc::new(callback));
        self
    }

    pub fn on_clear(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_clear = Some(Rc::new(callback));
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    fn apply(&mut self, partial: HotkeyRecorderOptions) {
        if partial.on_record.is_some() {
            self.on_record = partial.on_record;
        }
        if partial.on_cancel.is_some() {
            self.on_cancel = partial.on_cancel;
        }
        if partial.on_clear.is_some() {
            self.on_clear = partial.on_clear;
        }
        if partial.platform.is_some() {
            self.platform = partial.platform;
        }
    }
}

impl fmt::Debug for HotkeyRecorderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRecorderOptions")
            .field("on_record", &self.on_record.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_clear", &self.on_clear.is_some())
            .field("platform", &self.platform)
            .finish()
    }
}

/// Published snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyRecorderState {
    pub is_recording: bool,
    /// Last recorded descriptor, or the modifiers held so far while
    /// recording
    pub recorded_hotkey: Option<String>,
}

struct RecorderInner {
    dom: Dom,
    options: RefCell<HotkeyRecorderOptions>,
    store: Store<HotkeyRecorderState>,
    listener: Cell<Option<ListenerId>>,
}

impl RecorderInner {
    fn platform(&self) -> Platform {
        self.options
            .borrow()
            .platform
            .unwrap_or_else(Platform::current)
    }

    fn on_key_down(&self, event: &KeyboardEvent) {
        if !self.store.state().is_recording {
            return;
        }

        event.prevent_default();
        event.stop_propagation();

        let key = normalize_key_name(event.key());
        let modified = event.ctrl_key() || event.shift_key() || event.alt_key() || event.meta_key();

        if key == "Escape" {
            self.cancel();
            return;
        }

        if !modified && (key == "Backspace" || key == "Delete") {
            self.clear();
            return;
        }

        if is_modifier_key_name(&key) {
            let preview = modifier_preview(event, &key);
            trace!(preview = %preview, "Modifier held while recording");
            self.store.set_state(|_| HotkeyRecorderState {
                is_recording: true,
                recorded_hotkey: Some(preview),
            });
            return;
        }

        let platform = self.platform();
        let hotkey = convert_to_mod_format(&keyboard_event_to_hotkey(event), platform);
        if !descriptor_has_non_modifier_key(&hotkey, platform) {
            return;
        }

        self.detach();
        debug!(hotkey = %hotkey, "Recorded hotkey");
        self.store.set_state(|_| HotkeyRecorderState {
            is_recording: false,
            recorded_hotkey: Some(hotkey.clone()),
        });

        let on_record = self.options.borrow().on_record.clone();
        if let Some(callback) = on_record {
            callback(&hotkey);
        }
    }

    fn cancel(&self) {
        self.detach();
        self.store.set_state(|_| HotkeyRecorderState::default());
        debug!("Hotkey recording cancelled");

        let on_cancel = self.options.borrow().on_cancel.clone();
        if let Some(callback) = on_cancel {
            callback();
        }
    }

    fn clear(&self) {
        self.detach();
        self.store.set_state(|_| HotkeyRecorderState::default());
        debug!("Hotkey recording cleared");

        let on_clear = self.options.borrow().on_clear.clone();
        if let Some(callback) = on_clear {
            callback();
        }
    }

    fn detach(&self) {
        if let Some(listener) = self.listener.take() {
            self.dom.remove_listener(listener);
        }
    }
}

impl Drop for RecorderInner {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Held modifiers plus the one just pressed, e.g. `Control+Shift`.
fn modifier_preview(event: &KeyboardEvent, key: &str) -> String {
    let mut modifiers: Vec<CanonicalModifier> = [
        (event.ctrl_key(), CanonicalModifier::Control),
        (event.shift_key(), CanonicalModifier::Shift),
        (event.alt_key(), CanonicalModifier::Alt),
        (event.meta_key(), CanonicalModifier::Meta),
    ]
    .into_iter()
    .filter_map(|(held, modifier)| held.then_some(modifier))
    .collect();
    modifiers.extend(CanonicalModifier::from_key_name(key));

    ParsedHotkey::with_modifiers("", modifiers)
        .modifiers()
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("+")
}

/// Records one hotkey per `start`. Clones share state.
#[derive(Clone)]
pub struct HotkeyRecorder {
    inner: Rc<RecorderInner>,
}

impl HotkeyRecorder {
    pub fn new(dom: &Dom, options: HotkeyRecorderOptions) -> Self {
        Self {
            inner: Rc::new(RecorderInner {
                dom: dom.clone(),
                options: RefCell::new(options),
                store: Store::default(),
                listener: Cell::new(None),
            }),
        }
    }

    pub fn store(&self) -> &Store<HotkeyRecorderState> {
        &self.inner.store
    }

    pub fn is_recording(&self) -> bool {
        self.inner.store.state().is_recording
    }

    pub fn recorded_hotkey(&self) -> Option<String> {
        self.inner.store.state().recorded_hotkey.clone()
    }

    /// Merge the set fields of `options`; callbacks take effect on the next
    /// keydown.
    pub fn set_options(&self, options: HotkeyRecorderOptions) {
        self.inner.options.borrow_mut().apply(options);
    }

    /// Begin listening. No-op while already recording.
    pub fn start(&self) {
        if self.is_recording() {
            return;
        }

        self.inner.store.set_state(|_| HotkeyRecorderState {
            is_recording: true,
            recorded_hotkey: None,
        });

        let weak = Rc::downgrade(&self.inner);
        let listener = self
            .inner
            .dom
            .add_capture_key_listener(Target::Window, KeyEventType::KeyDown, move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_key_down(event);
                }
            });
        self.inner.listener.set(Some(listener));
        debug!("Hotkey recording started");
    }

    /// Stop listening and keep whatever was recorded.
    pub fn stop(&self) {
        self.inner.detach();
        if !self.is_recording() {
            return;
        }
        self.inner.store.set_state(|state| HotkeyRecorderState {
            is_recording: false,
            recorded_hotkey: state.recorded_hotkey.clone(),
        });
        debug!("Hotkey recording stopped");
    }

    /// Stop listening, drop the recording and notify `on_cancel`.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Detach and reset to the initial state without callbacks.
    pub fn destroy(&self) {
        self.inner.detach();
        self.inner
            .store
            .set_state(|_| HotkeyRecorderState::default());
    }
}

impl fmt::Debug for HotkeyRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRecorder")
            .field("state", &self.inner.store.state())
            .field("options", &self.inner.options.borrow())
            .finish()
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
