//! Which keys are physically down right now, independent of any hotkey.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

use crate::dom::{Dom, KeyEventType, KeyboardEvent, ListenerId, Target};
use crate::hotkey::{is_modifier_key_name, normalize_key_name};
use crate::store::Store;

/// Published snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStateTrackerState {
    /// Normalized key names in press order
    pub held_keys: Vec<String>,
    /// Normalized key name to physical `code` (empty when the host sent none)
    pub held_codes: BTreeMap<String, String>,
}

struct TrackerInner {
    dom: Dom,
    store: Store<KeyStateTrackerState>,
    listeners: RefCell<Vec<ListenerId>>,
}

impl TrackerInner {
    fn on_key_down(&self, event: &KeyboardEvent) {
        let key = normalize_key_name(event.key());
        if self.store.state().held_keys.contains(&key) {
            return;
        }

        let code = event.key_code().unwrap_or_default().to_string();
        trace!(key = %key, code = %code, "Key down");
        self.store.set_state(|state| {
            let mut next = state.clone();
            next.held_codes.insert(key.clone(), code);
            next.held_keys.push(key);
            next
        });
    }

    fn on_key_up(&self, event: &KeyboardEvent) {
        let key = normalize_key_name(event.key());
        let state = self.store.state();
        let releases_modifier = is_modifier_key_name(&key);

        // The OS may swallow the keyup of a key pressed with a modifier
        // (Cmd+S on macOS), so releasing a modifier also drops every held
        // non-modifier key.
        let keep = |held: &String| {
            held != &key && !(releases_modifier && !is_modifier_key_name(held))
        };
        if state.held_keys.iter().all(keep) {
            return;
        }

        trace!(key = %key, "Key up");
        self.store.set_state(|state| {
            let held_keys: Vec<String> = state.held_keys.iter().filter(|k| keep(k)).cloned().collect();
            let held_codes = state
                .held_codes
                .iter()
                .filter(|(k, _)| held_keys.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            KeyStateTrackerState {
                held_keys,
                held_codes,
            }
        });
    }

    fn clear(&self) {
        if self.store.state().held_keys.is_empty() {
            return;
        }
        self.store.set_state(|_| KeyStateTrackerState::default());
    }

    fn detach(&self) {
        for id in self.listeners.take() {
            self.dom.remove_listener(id);
        }
    }
}

impl Drop for TrackerInner {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Tracks held keys from window capture keydown/keyup and window blur, so
/// hotkeys that stop propagation cannot hide a key. Clones share state.
#[derive(Clone)]
pub struct KeyStateTracker {
    inner: Rc<TrackerInner>,
}

impl KeyStateTracker {
    pub fn new(dom: &Dom) -> Self {
        let inner = Rc::new(TrackerInner {
            dom: dom.clone(),
            store: Store::default(),
            listeners: RefCell::new(Vec::new()),
        });

        let keydown = {
            let weak = Rc::downgrade(&inner);
            dom.add_capture_key_listener(Target::Window, KeyEventType::KeyDown, move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_key_down(event);
                }
            })
        };
        let keyup = {
            let weak = Rc::downgrade(&inner);
            dom.add_capture_key_listener(Target::Window, KeyEventType::KeyUp, move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_key_up(event);
                }
            })
        };
        // Keys released while unfocused never report a keyup.
        let blur = {
            let weak = Rc::downgrade(&inner);
            dom.add_blur_listener(Target::Window, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.clear();
                }
            })
        };
        *inner.listeners.borrow_mut() = vec![keydown, keyup, blur];
        debug!("Key state tracker attached");

        Self { inner }
    }

    pub fn store(&self) -> &Store<KeyStateTrackerState> {
        &self.inner.store
    }

    pub fn held_keys(&self) -> Vec<String> {
        self.inner.store.state().held_keys.clone()
    }

    pub fn held_codes(&self) -> BTreeMap<String, String> {
        self.inner.store.state().held_codes.clone()
    }

    /// `key` is normalized first, so `"ctrl"` finds `Control`.
    pub fn is_key_held(&self, key: &str) -> bool {
        let key = normalize_key_name(key);
        self.inner.store.state().held_keys.contains(&key)
    }

    pub fn is_any_key_held<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        keys.iter().any(|key| self.is_key_held(key.as_ref()))
    }

    /// True for an empty list.
    pub fn are_all_keys_held<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        keys.iter().all(|key| self.is_key_held(key.as_ref()))
    }

    /// Detach from the host and forget every held key.
    pub fn close(&self) {
        self.inner.detach();
        self.inner.clear();
        debug!("Key state tracker closed");
    }
}

impl fmt::Debug for KeyStateTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStateTracker")
            .field("held_keys", &self.inner.store.state().held_keys)
            .finish()
    }
}

#[cfg(test)]
#[path = "key_state_tests.rs"]
mod tests;
