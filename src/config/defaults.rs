//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

use crate::dom::KeyEventType;
use crate::manager::ConflictBehavior;

/// Default hotkey registration behavior
pub const DEFAULT_CONFLICT_BEHAVIOR: ConflictBehavior = ConflictBehavior::Warn;
pub const DEFAULT_ENABLED: bool = true;
pub const DEFAULT_EVENT_TYPE: KeyEventType = KeyEventType::KeyDown;
pub const DEFAULT_PREVENT_DEFAULT: bool = true;
pub const DEFAULT_STOP_PROPAGATION: bool = true;
pub const DEFAULT_REQUIRE_RESET: bool = false;

/// Maximum gap between two keys of a sequence (milliseconds)
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 1000;

/// Config file name inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_DIR_NAME: &str = "hotkeys";
