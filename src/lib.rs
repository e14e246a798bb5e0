//! Hotkeys - keyboard shortcut registration and matching
//!
//! Register single hotkeys, Vim-style sequences and held-key queries against
//! an in-process event host, with per-target scoping, conflict handling and
//! a recorder for capturing new shortcuts.
//!
//! - [`hotkey`] - pure descriptor parsing, formatting, matching, validation
//! - [`dom`] - the event host: targets, elements, keyboard events, dispatch
//! - [`manager`] - the hotkey registration table
//! - [`sequence`] - multi-key sequences
//! - [`key_state`] - currently held keys
//! - [`recorder`] - capture the next key combination
//! - [`context`] - all of the above wired to one host and config

pub mod config;
pub mod context;
pub mod dom;
pub mod error;
pub mod hotkey;
pub mod key_state;
pub mod logging;
pub mod manager;
pub mod recorder;
pub mod sequence;
pub mod store;

#[cfg(test)]
mod test_support;

pub use context::HotkeysContext;
pub use dom::{Dom, Element, KeyEventType, KeyboardEvent, ListenerPhase, Target};
pub use error::{HotkeyError, Result};
pub use hotkey::{ParsedHotkey, Platform, RawHotkey};
pub use key_state::KeyStateTracker;
pub use manager::{ConflictBehavior, HotkeyManager, HotkeyOptions, HotkeyRegistrationHandle};
pub use recorder::{HotkeyRecorder, HotkeyRecorderOptions};
pub use sequence::{SequenceHandle, SequenceManager, SequenceMatcher, SequenceOptions};
