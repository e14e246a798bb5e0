//! Core hotkey descriptor types.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

use super::constants::{CanonicalModifier, MODIFIER_ORDER};
use crate::dom::KeyboardEvent;

/// Active modifiers, always in canonical order.
pub type ModifierList = SmallVec<[CanonicalModifier; 4]>;

/// Canonical, platform-resolved form of a hotkey descriptor.
///
/// The `modifiers` list is derived from the four flags at construction time,
/// so the two views can never disagree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedHotkey {
    key: String,
    ctrl: bool,
    shift: bool,
    alt: bool,
    meta: bool,
    modifiers: ModifierList,
}

impl ParsedHotkey {
    pub fn new(key: impl Into<String>, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let modifiers = MODIFIER_ORDER
            .iter()
            .copied()
            .filter(|m| match m {
                CanonicalModifier::Control => ctrl,
                CanonicalModifier::Alt => alt,
                CanonicalModifier::Shift => shift,
                CanonicalModifier::Meta => meta,
            })
            .collect();

        Self {
            key: key.into(),
            ctrl,
            shift,
            alt,
            meta,
            modifiers,
        }
    }

    /// Build from an unordered set of modifiers. Duplicates collapse.
    pub fn with_modifiers(
        key: impl Into<String>,
        modifiers: impl IntoIterator<Item = CanonicalModifier>,
    ) -> Self {
        let (mut ctrl, mut shift, mut alt, mut meta) = (false, false, false, false);
        for modifier in modifiers {
            match modifier {
                CanonicalModifier::Control => ctrl = true,
                CanonicalModifier::Shift => shift = true,
                CanonicalModifier::Alt => alt = true,
                CanonicalModifier::Meta => meta = true,
            }
        }
        Self::new(key, ctrl, shift, alt, meta)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn alt(&self) -> bool {
        self.alt
    }

    pub fn meta(&self) -> bool {
        self.meta
    }

    pub fn modifiers(&self) -> &[CanonicalModifier] {
        &self.modifiers
    }

    pub fn has_modifier(&self, modifier: CanonicalModifier) -> bool {
        match modifier {
            CanonicalModifier::Control => self.ctrl,
            CanonicalModifier::Shift => self.shift,
            CanonicalModifier::Alt => self.alt,
            CanonicalModifier::Meta => self.meta,
        }
    }
}

/// Object form of a descriptor. `mod_key` is the platform-adaptive modifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHotkey {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default, rename = "mod")]
    pub mod_key: bool,
}

impl RawHotkey {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_mod(mut self) -> Self {
        self.mod_key = true;
        self
    }
}

/// Anything the manager accepts as a hotkey.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterableHotkey {
    Text(String),
    Raw(RawHotkey),
}

impl From<&str> for RegisterableHotkey {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RegisterableHotkey {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for RegisterableHotkey {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<RawHotkey> for RegisterableHotkey {
    fn from(raw: RawHotkey) -> Self {
        Self::Raw(raw)
    }
}

impl fmt::Display for RegisterableHotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Raw(raw) => write!(f, "{raw:?}"),
        }
    }
}

/// Passed to every callback alongside the triggering event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotkeyCallbackContext {
    /// The descriptor as registered (space-joined for sequences).
    pub hotkey: String,
    pub parsed_hotkey: ParsedHotkey,
}

pub type HotkeyCallback = Rc<dyn Fn(&KeyboardEvent, &HotkeyCallbackContext)>;
