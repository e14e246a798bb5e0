//! Descriptor parsing and keyboard-event conversion.

use super::constants::{
    modifier_alias, normalize_key_name, resolve_alias, resolve_modifier, CanonicalModifier,
    Platform,
};
use super::format::format_hotkey;
use super::types::{ParsedHotkey, RawHotkey};
use crate::dom::KeyboardEvent;

/// Parse a `Modifier+Modifier+Key` descriptor.
///
/// Every `+`-separated part but the last is a modifier; unknown modifier
/// tokens are dropped. The last part is the key. Parsing never fails.
///
/// ```
/// use hotkeys::hotkey::{parse_hotkey, Platform};
///
/// let parsed = parse_hotkey("Mod+Shift+s", Platform::Mac);
/// assert!(parsed.meta() && parsed.shift() && !parsed.ctrl());
/// assert_eq!(parsed.key(), "S");
/// ```
pub fn parse_hotkey(hotkey: &str, platform: Platform) -> ParsedHotkey {
    let parts: Vec<&str> = hotkey.split('+').collect();
    let last = parts.len() - 1;

    let mut modifiers: Vec<CanonicalModifier> = Vec::with_capacity(last);
    for part in &parts[..last] {
        if let Some(alias) = modifier_alias(part.trim()) {
            modifiers.push(resolve_alias(alias, platform));
        }
    }

    let key = normalize_key_name(parts[last].trim());
    ParsedHotkey::with_modifiers(key, modifiers)
}

/// Convert the object form, resolving `mod` for `platform`.
pub fn raw_hotkey_to_parsed_hotkey(raw: &RawHotkey, platform: Platform) -> ParsedHotkey {
    let mut ctrl = raw.ctrl;
    let mut meta = raw.meta;

    if raw.mod_key {
        match resolve_modifier("Mod", platform) {
            Some(CanonicalModifier::Meta) => meta = true,
            _ => ctrl = true,
        }
    }

    ParsedHotkey::new(raw.key.clone(), ctrl, raw.shift, raw.alt, meta)
}

/// Canonical string: full modifier names in canonical order, normalized key.
pub fn normalize_hotkey(hotkey: &str, platform: Platform) -> String {
    format_hotkey(&parse_hotkey(hotkey, platform))
}

/// True for any recognised modifier token (case-insensitive).
pub fn is_modifier(key: &str) -> bool {
    modifier_alias(key).is_some()
}

/// Snapshot an event as a parsed hotkey.
pub fn parse_keyboard_event(event: &KeyboardEvent) -> ParsedHotkey {
    ParsedHotkey::new(
        normalize_key_name(event.key()),
        event.ctrl_key(),
        event.shift_key(),
        event.alt_key(),
        event.meta_key(),
    )
}

/// Canonical descriptor for an event, e.g. `Control+Shift+S`.
pub fn keyboard_event_to_hotkey(event: &KeyboardEvent) -> String {
    format_hotkey(&parse_keyboard_event(event))
}

/// True when the pressed key is itself a modifier.
pub fn is_modifier_key(event: &KeyboardEvent) -> bool {
    matches!(
        event.key(),
        "Control" | "Shift" | "Alt" | "Meta" | "Command" | "OS" | "Win"
    )
}

/// True if the descriptor names an action key, not only modifiers.
pub fn has_non_modifier_key(parsed: &ParsedHotkey) -> bool {
    !parsed.key().is_empty() && !is_modifier(parsed.key())
}

/// [`has_non_modifier_key`] for a textual descriptor.
pub fn descriptor_has_non_modifier_key(hotkey: &str, platform: Platform) -> bool {
    has_non_modifier_key(&parse_hotkey(hotkey, platform))
}

/// Rewrite the platform's primary modifier as `Mod`.
///
/// On macOS `Meta` becomes `Mod` when Control is absent; elsewhere `Control`
/// becomes `Mod` when Meta is absent. Other descriptors come back unchanged.
pub fn convert_to_mod_format(hotkey: &str, platform: Platform) -> String {
    let parsed = parse_hotkey(hotkey, platform);

    let primary = if platform.is_mac() && parsed.meta() && !parsed.ctrl() {
        "Meta"
    } else if !platform.is_mac() && parsed.ctrl() && !parsed.meta() {
        "Control"
    } else {
        return hotkey.to_string();
    };

    hotkey
        .split('+')
        .map(|part| if part == primary { "Mod" } else { part })
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
