//! Configuration module - default options for managers and recorders
//!
//! This module provides functionality for:
//! - Loading configuration from `<config dir>/hotkeys/config.json`
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions
//! - `loader` - File system loading and parsing

pub mod defaults;
mod loader;
mod types;

pub use types::{HotkeyDefaults, HotkeysConfig, RecorderDefaults, SequenceDefaults};

pub use loader::{default_config_path, load_config, try_load_config};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
