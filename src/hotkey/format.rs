//! Canonical and human-readable rendering of parsed hotkeys.

use super::constants::{key_display_symbol, CanonicalModifier, Platform};
use super::parse::parse_hotkey;
use super::types::ParsedHotkey;

/// Canonical descriptor text; the inverse of [`parse_hotkey`].
pub fn format_hotkey(parsed: &ParsedHotkey) -> String {
    let mut parts: Vec<&str> = parsed.modifiers().iter().map(|m| m.as_str()).collect();
    parts.push(parsed.key());
    parts.join("+")
}

/// Display string for `platform`: concatenated symbols on macOS (`⇧⌘S`),
/// `+`-joined labels elsewhere (`Ctrl+Shift+S`).
pub fn format_for_display(parsed: &ParsedHotkey, platform: Platform) -> String {
    let key = key_display_symbol(parsed.key()).unwrap_or(parsed.key());

    if platform.is_mac() {
        let mut out: String = parsed.modifiers().iter().map(|m| m.mac_symbol()).collect();
        out.push_str(key);
        return out;
    }

    let mut parts: Vec<&str> = parsed
        .modifiers()
        .iter()
        .map(|m| m.standard_label())
        .collect();
    parts.push(key);
    parts.join("+")
}

/// [`format_for_display`] for a textual descriptor.
pub fn format_descriptor_for_display(hotkey: &str, platform: Platform) -> String {
    format_for_display(&parse_hotkey(hotkey, platform), platform)
}

/// Word labels instead of symbols: `Shift+Cmd+S` on macOS, `Ctrl+Shift+S`
/// elsewhere.
pub fn format_with_labels(hotkey: &str, platform: Platform) -> String {
    let parsed = parse_hotkey(hotkey, platform);
    let mut parts: Vec<&str> = parsed
        .modifiers()
        .iter()
        .map(|m| match (m, platform) {
            (CanonicalModifier::Control, _) => "Ctrl",
            (CanonicalModifier::Alt, Platform::Mac) => "Option",
            (CanonicalModifier::Alt, _) => "Alt",
            (CanonicalModifier::Shift, _) => "Shift",
            (CanonicalModifier::Meta, Platform::Mac) => "Cmd",
            (CanonicalModifier::Meta, _) => "Win",
        })
        .collect();
    parts.push(parsed.key());
    parts.join("+")
}

/// Whether a debugging label comes from `event.key` or `event.code`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeySource {
    #[default]
    Key,
    Code,
}

/// Label for a single held key in a debugging view.
///
/// Modifiers get platform names (`⌘ Mod (Cmd)`, `Mod (Ctrl)`, `Super`), special
/// keys get their symbol, and `code` values pass through untouched.
pub fn format_key_for_debugging_display(key: &str, platform: Platform, source: KeySource) -> String {
    if source == KeySource::Code {
        return key.to_string();
    }

    if let Some(modifier) = CanonicalModifier::from_key_name(key) {
        let label = match (platform, modifier) {
            (Platform::Mac, CanonicalModifier::Meta) => "Mod (Cmd)",
            (Platform::Mac, CanonicalModifier::Control) => "Ctrl",
            (Platform::Mac, CanonicalModifier::Alt) => "Opt",
            (_, CanonicalModifier::Control) => "Mod (Ctrl)",
            (Platform::Windows, CanonicalModifier::Meta) => "Win",
            (_, CanonicalModifier::Meta) => "Super",
            (_, CanonicalModifier::Alt) => "Alt",
            (_, CanonicalModifier::Shift) => "Shift",
        };
        if platform.is_mac() {
            return format!("{} {}", modifier.mac_symbol(), label);
        }
        return label.to_string();
    }

    key_display_symbol(key).unwrap_or(key).to_string()
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
