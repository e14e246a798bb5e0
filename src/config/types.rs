//! Configuration type definitions
//!
//! Every field is optional in the file; missing values fall back to the
//! constants in `defaults`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::*;
use crate::dom::KeyEventType;
use crate::hotkey::Platform;
use crate::manager::{ConflictBehavior, HotkeyOptions};
use crate::sequence::SequenceOptions;

// =============================================================================
// HOTKEY DEFAULTS
// =============================================================================

/// Defaults applied beneath every `register` call's own options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyDefaults {
    #[serde(default = "default_conflict_behavior")]
    pub conflict_behavior: ConflictBehavior,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_event_type")]
    pub event_type: KeyEventType,
    /// Unset keeps the per-hotkey heuristic (Ctrl/Meta combos and Escape fire
    /// inside inputs, everything else is suppressed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_inputs: Option<bool>,
    #[serde(default = "default_prevent_default")]
    pub prevent_default: bool,
    #[serde(default = "default_stop_propagation")]
    pub stop_propagation: bool,
    #[serde(default = "default_require_reset")]
    pub require_reset: bool,
}

fn default_conflict_behavior() -> ConflictBehavior {
    DEFAULT_CONFLICT_BEHAVIOR
}
fn default_enabled() -> bool {
    DEFAULT_ENABLED
}
fn default_event_type() -> KeyEventType {
    DEFAULT_EVENT_TYPE
}
fn default_prevent_default() -> bool {
    DEFAULT_PREVENT_DEFAULT
}
fn default_stop_propagation() -> bool {
    DEFAULT_STOP_PROPAGATION
}
fn default_require_reset() -> bool {
    DEFAULT_REQUIRE_RESET
}

impl Default for HotkeyDefaults {
    fn default() -> Self {
        HotkeyDefaults {
            conflict_behavior: DEFAULT_CONFLICT_BEHAVIOR,
            enabled: DEFAULT_ENABLED,
            event_type: DEFAULT_EVENT_TYPE,
            ignore_inputs: None,
            prevent_default: DEFAULT_PREVENT_DEFAULT,
            stop_propagation: DEFAULT_STOP_PROPAGATION,
            require_reset: DEFAULT_REQUIRE_RESET,
        }
    }
}

impl HotkeyDefaults {
    pub fn to_options(&self) -> HotkeyOptions {
        HotkeyOptions {
            conflict_behavior: Some(self.conflict_behavior),
            enabled: Some(self.enabled),
            event_type: Some(self.event_type),
            ignore_inputs: self.ignore_inputs,
            platform: None,
            prevent_default: Some(self.prevent_default),
            require_reset: Some(self.require_reset),
            stop_propagation: Some(self.stop_propagation),
            target: None,
        }
    }
}

// =============================================================================
// SEQUENCE DEFAULTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceDefaults {
    /// Maximum gap between keys in milliseconds (default: 1000)
    #[serde(default = "default_sequence_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_prevent_default")]
    pub prevent_default: bool,
    #[serde(default = "default_stop_propagation")]
    pub stop_propagation: bool,
}

fn default_sequence_timeout_ms() -> u64 {
    DEFAULT_SEQUENCE_TIMEOUT_MS
}

impl Default for SequenceDefaults {
    fn default() -> Self {
        SequenceDefaults {
            timeout_ms: DEFAULT_SEQUENCE_TIMEOUT_MS,
            enabled: DEFAULT_ENABLED,
            prevent_default: DEFAULT_PREVENT_DEFAULT,
            stop_propagation: DEFAULT_STOP_PROPAGATION,
        }
    }
}

impl SequenceDefaults {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn to_options(&self) -> SequenceOptions {
        SequenceOptions {
            timeout: Some(self.timeout()),
            enabled: Some(self.enabled),
            prevent_default: Some(self.prevent_default),
            stop_propagation: Some(self.stop_propagation),
            platform: None,
        }
    }
}

// =============================================================================
// RECORDER DEFAULTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderDefaults {
    /// Platform used when converting recorded combinations to `Mod` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

// =============================================================================
// ROOT CONFIG
// =============================================================================

/// Root of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeysConfig {
    /// Overrides platform detection for every manager (default: detected)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub hotkey: HotkeyDefaults,
    #[serde(default)]
    pub sequence: SequenceDefaults,
    #[serde(default)]
    pub recorder: RecorderDefaults,
}

impl HotkeysConfig {
    /// The configured platform, or the detected one.
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    pub fn recorder_platform(&self) -> Platform {
        self.recorder.platform.unwrap_or_else(|| self.platform())
    }
}
