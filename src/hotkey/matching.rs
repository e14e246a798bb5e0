//! Event-to-descriptor matching.

use super::constants::{normalize_key_name, Platform};
use super::format::format_hotkey;
use super::parse::parse_hotkey;
use super::types::{HotkeyCallback, HotkeyCallbackContext, ParsedHotkey};
use crate::dom::KeyboardEvent;
use std::rc::Rc;

/// True if `event` satisfies `parsed` exactly.
///
/// All four modifier flags must be equal; an extra held modifier fails.
/// Single-character keys compare case-insensitively and fall back to the
/// physical `code` (`KeyT`, `Digit4`) when the layout turned the key into a
/// symbol. Named keys compare exactly after normalization.
pub fn matches_keyboard_event(event: &KeyboardEvent, parsed: &ParsedHotkey) -> bool {
    if event.ctrl_key() != parsed.ctrl()
        || event.shift_key() != parsed.shift()
        || event.alt_key() != parsed.alt()
        || event.meta_key() != parsed.meta()
    {
        return false;
    }

    let event_key = normalize_key_name(event.key());
    let hotkey_key = parsed.key();

    if is_single_char(&event_key) && is_single_char(hotkey_key) {
        if event_key.to_uppercase() == hotkey_key.to_uppercase() {
            return true;
        }
        return event
            .key_code()
            .and_then(physical_char_from_code)
            .is_some_and(|c| c.to_string().eq_ignore_ascii_case(hotkey_key));
    }

    event_key == hotkey_key
}

/// [`matches_keyboard_event`] against a textual descriptor.
pub fn matches_descriptor(event: &KeyboardEvent, hotkey: &str, platform: Platform) -> bool {
    matches_keyboard_event(event, &parse_hotkey(hotkey, platform))
}

fn is_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Letter from `Key<L>` or digit from `Digit<N>`.
fn physical_char_from_code(code: &str) -> Option<char> {
    let rest = code
        .strip_prefix("Key")
        .filter(|rest| rest.len() == 1 && rest.chars().all(|c| c.is_ascii_alphabetic()))
        .or_else(|| {
            code.strip_prefix("Digit")
                .filter(|rest| rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()))
        })?;
    rest.chars().next()
}

/// Options for the standalone handler builders.
#[derive(Clone, Copy, Debug)]
pub struct HotkeyHandlerOptions {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    pub platform: Platform,
}

impl Default for HotkeyHandlerOptions {
    fn default() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
            platform: Platform::current(),
        }
    }
}

impl HotkeyHandlerOptions {
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn prevent_default(mut self, prevent_default: bool) -> Self {
        self.prevent_default = prevent_default;
        self
    }

    pub fn stop_propagation(mut self, stop_propagation: bool) -> Self {
        self.stop_propagation = stop_propagation;
        self
    }
}

fn apply_side_effects(event: &KeyboardEvent, options: &HotkeyHandlerOptions) {
    if options.prevent_default {
        event.prevent_default();
    }
    if options.stop_propagation {
        event.stop_propagation();
    }
}

/// Wrap one descriptor and callback into an event handler.
pub fn create_hotkey_handler(
    hotkey: &str,
    callback: impl Fn(&KeyboardEvent, &HotkeyCallbackContext) + 'static,
    options: HotkeyHandlerOptions,
) -> impl Fn(&KeyboardEvent) {
    let context = HotkeyCallbackContext {
        hotkey: hotkey.to_string(),
        parsed_hotkey: parse_hotkey(hotkey, options.platform),
    };
    move |event: &KeyboardEvent| {
        if matches_keyboard_event(event, &context.parsed_hotkey) {
            apply_side_effects(event, &options);
            callback(event, &context);
        }
    }
}

/// [`create_hotkey_handler`] for an already-parsed hotkey.
pub fn create_parsed_hotkey_handler(
    parsed: ParsedHotkey,
    callback: impl Fn(&KeyboardEvent, &HotkeyCallbackContext) + 'static,
    options: HotkeyHandlerOptions,
) -> impl Fn(&KeyboardEvent) {
    let context = HotkeyCallbackContext {
        hotkey: format_hotkey(&parsed),
        parsed_hotkey: parsed,
    };
    move |event: &KeyboardEvent| {
        if matches_keyboard_event(event, &context.parsed_hotkey) {
            apply_side_effects(event, &options);
            callback(event, &context);
        }
    }
}

/// Handler over several descriptors. Only the first match, in the given
/// order, runs.
pub fn create_multi_hotkey_handler<'a>(
    handlers: impl IntoIterator<Item = (&'a str, HotkeyCallback)>,
    options: HotkeyHandlerOptions,
) -> impl Fn(&KeyboardEvent) {
    let entries: Vec<(HotkeyCallbackContext, HotkeyCallback)> = handlers
        .into_iter()
        .map(|(hotkey, callback)| {
            let context = HotkeyCallbackContext {
                hotkey: hotkey.to_string(),
                parsed_hotkey: parse_hotkey(hotkey, options.platform),
            };
            (context, callback)
        })
        .collect();

    move |event: &KeyboardEvent| {
        let matched = entries
            .iter()
            .find(|(context, _)| matches_keyboard_event(event, &context.parsed_hotkey));
        if let Some((context, callback)) = matched {
            apply_side_effects(event, &options);
            let callback = Rc::clone(callback);
            callback(event, context);
        }
    }
}

#[cfg(test)]
#[path = "matching_tests.rs"]
mod tests;
