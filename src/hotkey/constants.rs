//! Key-name normalization, modifier resolution and display tables.
//!
//! Everything here is pure: the same input always yields the same canonical
//! name, on every platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operating system family used to resolve `Mod` and pick display styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Platform::Mac
        }
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Platform::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }

    pub fn is_mac(self) -> bool {
        self == Platform::Mac
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform '{0}' (expected mac, windows or linux)")]
pub struct PlatformParseError(pub String);

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mac" | "macos" | "darwin" | "osx" => Ok(Platform::Mac),
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}

/// Detect the host platform.
pub fn detect_platform() -> Platform {
    Platform::current()
}

/// One of the four concrete modifier keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalModifier {
    Control,
    Alt,
    Shift,
    Meta,
}

/// Canonical modifier order used by every formatter.
pub const MODIFIER_ORDER: [CanonicalModifier; 4] = [
    CanonicalModifier::Control,
    CanonicalModifier::Alt,
    CanonicalModifier::Shift,
    CanonicalModifier::Meta,
];

impl CanonicalModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Control => "Control",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Meta => "Meta",
        }
    }

    pub fn mac_symbol(self) -> &'static str {
        match self {
            Self::Control => "⌃",
            Self::Alt => "⌥",
            Self::Shift => "⇧",
            Self::Meta => "⌘",
        }
    }

    /// Label used on Windows and Linux.
    pub fn standard_label(self) -> &'static str {
        match self {
            Self::Control => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Meta => "Win",
        }
    }

    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Control" => Some(Self::Control),
            "Alt" => Some(Self::Alt),
            "Shift" => Some(Self::Shift),
            "Meta" => Some(Self::Meta),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A modifier token as written in a descriptor, before platform resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierAlias {
    Canonical(CanonicalModifier),
    /// `Mod`: Command on macOS, Control elsewhere.
    Mod,
}

/// Look up a modifier token. Matching is case-insensitive.
pub fn modifier_alias(token: &str) -> Option<ModifierAlias> {
    use CanonicalModifier::*;

    let alias = match token.to_lowercase().as_str() {
        "control" | "ctrl" => ModifierAlias::Canonical(Control),
        "shift" => ModifierAlias::Canonical(Shift),
        "alt" | "option" | "opt" => ModifierAlias::Canonical(Alt),
        "meta" | "command" | "cmd" => ModifierAlias::Canonical(Meta),
        "mod" | "commandorcontrol" | "cmdorctrl" => ModifierAlias::Mod,
        _ => return None,
    };
    Some(alias)
}

/// Resolve a modifier token to a concrete modifier for `platform`.
pub fn resolve_modifier(name: &str, platform: Platform) -> Option<CanonicalModifier> {
    modifier_alias(name).map(|alias| resolve_alias(alias, platform))
}

pub fn resolve_alias(alias: ModifierAlias, platform: Platform) -> CanonicalModifier {
    match alias {
        ModifierAlias::Canonical(modifier) => modifier,
        ModifierAlias::Mod if platform.is_mac() => CanonicalModifier::Meta,
        ModifierAlias::Mod => CanonicalModifier::Control,
    }
}

/// True for the canonical names of the four modifier keys.
pub fn is_modifier_key_name(key: &str) -> bool {
    CanonicalModifier::from_key_name(key).is_some()
}

/// Map an event key or alias to its canonical name.
///
/// Single characters are uppercased and function keys become `F1`..`F24`.
/// Unknown multi-character names pass through unchanged.
pub fn normalize_key_name(raw: &str) -> String {
    if let Some(alias) = key_alias(raw) {
        return alias.to_string();
    }

    let mut chars = raw.chars();
    if let (Some(_), None) = (chars.next(), chars.next()) {
        return raw.to_uppercase();
    }

    if is_function_key(raw) {
        return raw.to_uppercase();
    }

    raw.to_string()
}

fn key_alias(raw: &str) -> Option<&'static str> {
    if raw == " " {
        return Some("Space");
    }

    let key = match raw.to_lowercase().as_str() {
        "esc" | "escape" => "Escape",
        "return" | "enter" => "Enter",
        "del" | "delete" => "Delete",
        "backspace" => "Backspace",
        "tab" => "Tab",
        "space" | "spacebar" => "Space",
        "up" | "arrowup" => "ArrowUp",
        "down" | "arrowdown" => "ArrowDown",
        "left" | "arrowleft" => "ArrowLeft",
        "right" | "arrowright" => "ArrowRight",
        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" => "PageUp",
        "pagedown" | "pgdn" => "PageDown",
        "insert" | "ins" => "Insert",
        "capslock" => "CapsLock",
        "control" | "ctrl" => "Control",
        "shift" => "Shift",
        "alt" | "option" => "Alt",
        "meta" | "command" | "cmd" | "os" | "win" => "Meta",
        _ => return None,
    };
    Some(key)
}

fn is_function_key(raw: &str) -> bool {
    let Some(digits) = raw.strip_prefix('F').or_else(|| raw.strip_prefix('f')) else {
        return false;
    };
    (1..=2).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(digits.parse::<u8>(), Ok(1..=24))
}

/// Display symbol for special keys, shared by every platform.
pub fn key_display_symbol(key: &str) -> Option<&'static str> {
    let symbol = match key {
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        "Enter" => "↵",
        "Escape" => "Esc",
        "Backspace" => "⌫",
        "Delete" => "⌦",
        "Tab" => "⇥",
        "Space" => "␣",
        _ => return None,
    };
    Some(symbol)
}

/// Keys the validator recognises without a warning.
pub fn is_known_key(key: &str) -> bool {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return c.is_ascii_alphanumeric() || "/[]\\=-,.`;'".contains(c);
    }

    is_function_key(key)
        || matches!(
            key,
            "Escape"
                | "Enter"
                | "Tab"
                | "Space"
                | "Backspace"
                | "Delete"
                | "Insert"
                | "Home"
                | "End"
                | "PageUp"
                | "PageDown"
                | "ArrowUp"
                | "ArrowDown"
                | "ArrowLeft"
                | "ArrowRight"
                | "CapsLock"
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_key_name("Esc"), "Escape");
        assert_eq!(normalize_key_name("return"), "Enter");
        assert_eq!(normalize_key_name("Del"), "Delete");
        assert_eq!(normalize_key_name(" "), "Space");
        assert_eq!(normalize_key_name("Up"), "ArrowUp");
        assert_eq!(normalize_key_name("Command"), "Meta");
    }

    #[test]
    fn test_normalize_case() {
        assert_eq!(normalize_key_name("a"), "A");
        assert_eq!(normalize_key_name("f5"), "F5");
        assert_eq!(normalize_key_name("F12"), "F12");
        assert_eq!(normalize_key_name("/"), "/");
        assert_eq!(normalize_key_name("MediaPlayPause"), "MediaPlayPause");
        assert_eq!(normalize_key_name("fx"), "fx");
    }

    #[test]
    fn test_resolve_mod_by_platform() {
        assert_eq!(
            resolve_modifier("Mod", Platform::Mac),
            Some(CanonicalModifier::Meta)
        );
        assert_eq!(
            resolve_modifier("mod", Platform::Windows),
            Some(CanonicalModifier::Control)
        );
        assert_eq!(
            resolve_modifier("Option", Platform::Linux),
            Some(CanonicalModifier::Alt)
        );
        assert_eq!(resolve_modifier("Hyper", Platform::Mac), None);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("macos".parse::<Platform>(), Ok(Platform::Mac));
        assert_eq!("Windows".parse::<Platform>(), Ok(Platform::Windows));
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Mac).unwrap();
        assert_eq!(json, "\"mac\"");
    }

    #[test]
    fn test_known_keys() {
        assert!(is_known_key("A"));
        assert!(is_known_key("F11"));
        assert!(is_known_key("ArrowLeft"));
        assert!(!is_known_key("SomeWeirdKey"));
    }
}
