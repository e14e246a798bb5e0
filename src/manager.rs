//! Hotkey manager: the registration table and per-target listener
//! multiplexing.
//!
//! Every distinct [`Target`] gets exactly one keydown/keyup listener pair no
//! matter how many hotkeys are bound to it. The pair is attached with the
//! first registration on that target and detached with the last.
//!
//! Registrations are published through a [`Store`] so observers (debug
//! panels, tests) see each change as a fresh table snapshot. Entries are
//! shared `Rc`s: a republish keeps identities stable while `has_fired`,
//! `trigger_count`, the callback and the options mutate in place.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

use crate::dom::{Dom, KeyEventType, KeyboardEvent, ListenerId, Target};
use crate::error::{HotkeyError, Result};
use crate::hotkey::{
    format_hotkey, matches_keyboard_event, normalize_hotkey, normalize_key_name,
    resolve_registerable, HotkeyCallback, HotkeyCallbackContext, ParsedHotkey, Platform,
    RegisterableHotkey,
};
use crate::store::Store;

// =============================================================================
// OPTIONS
// =============================================================================

/// What `register` does when the same hotkey is already bound to the same
/// target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictBehavior {
    /// Log a warning and register anyway; both callbacks fire.
    #[default]
    Warn,
    /// Fail with [`HotkeyError::Conflict`], leaving the table unchanged.
    Error,
    /// Evict the existing registration first.
    Replace,
    /// Register silently.
    Allow,
}

/// Per-registration options. Unset fields fall back to the manager's
/// defaults, then to the built-in ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HotkeyOptions {
    pub conflict_behavior: Option<ConflictBehavior>,
    pub enabled: Option<bool>,
    pub event_type: Option<KeyEventType>,
    pub ignore_inputs: Option<bool>,
    pub platform: Option<Platform>,
    pub prevent_default: Option<bool>,
    pub require_reset: Option<bool>,
    pub stop_propagation: Option<bool>,
    /// Listening scope (default: the document)
    pub target: Option<Target>,
}

impl HotkeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conflict_behavior(mut self, behavior: ConflictBehavior) -> Self {
        self.conflict_behavior = Some(behavior);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn event_type(mut self, event_type: KeyEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn ignore_inputs(mut self, ignore: bool) -> Self {
        self.ignore_inputs = Some(ignore);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = Some(prevent);
        self
    }

    pub fn require_reset(mut self, require: bool) -> Self {
        self.require_reset = Some(require);
        self
    }

    pub fn stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = Some(stop);
        self
    }

    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Fill every unset field from `base`.
    pub fn merged_over(self, base: &HotkeyOptions) -> HotkeyOptions {
        HotkeyOptions {
            conflict_behavior: self.conflict_behavior.or(base.conflict_behavior),
            enabled: self.enabled.or(base.enabled),
            event_type: self.event_type.or(base.event_type),
            ignore_inputs: self.ignore_inputs.or(base.ignore_inputs),
            platform: self.platform.or(base.platform),
            prevent_default: self.prevent_default.or(base.prevent_default),
            require_reset: self.require_reset.or(base.require_reset),
            stop_propagation: self.stop_propagation.or(base.stop_propagation),
            target: self.target.or_else(|| base.target.clone()),
        }
    }
}

/// Fully resolved options stored on a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedHotkeyOptions {
    pub conflict_behavior: ConflictBehavior,
    pub enabled: bool,
    pub event_type: KeyEventType,
    pub ignore_inputs: bool,
    pub platform: Platform,
    pub prevent_default: bool,
    pub require_reset: bool,
    pub stop_propagation: bool,
}

impl ResolvedHotkeyOptions {
    fn resolve(options: &HotkeyOptions, parsed: &ParsedHotkey, platform: Platform) -> Self {
        Self {
            conflict_behavior: options.conflict_behavior.unwrap_or_default(),
            enabled: options.enabled.unwrap_or(true),
            event_type: options.event_type.unwrap_or_default(),
            ignore_inputs: options
                .ignore_inputs
                .unwrap_or_else(|| default_ignore_inputs(parsed)),
            platform,
            prevent_default: options.prevent_default.unwrap_or(true),
            require_reset: options.require_reset.unwrap_or(false),
            stop_propagation: options.stop_propagation.unwrap_or(true),
        }
    }

    /// Shallow-merge the set fields of `partial`. The target is fixed at
    /// registration time and is not affected.
    pub fn apply(&mut self, partial: &HotkeyOptions) {
        if let Some(behavior) = partial.conflict_behavior {
            self.conflict_behavior = behavior;
        }
        if let Some(enabled) = partial.enabled {
            self.enabled = enabled;
        }
        if let Some(event_type) = partial.event_type {
            self.event_type = event_type;
        }
        if let Some(ignore) = partial.ignore_inputs {
            self.ignore_inputs = ignore;
        }
        if let Some(platform) = partial.platform {
            self.platform = platform;
        }
        if let Some(prevent) = partial.prevent_default {
            self.prevent_default = prevent;
        }
        if let Some(require) = partial.require_reset {
            self.require_reset = require;
        }
        if let Some(stop) = partial.stop_propagation {
            self.stop_propagation = stop;
        }
    }
}

/// Ctrl/Meta shortcuts and bare Escape keep working while the user types;
/// everything else is suppressed inside inputs.
fn default_ignore_inputs(parsed: &ParsedHotkey) -> bool {
    !(parsed.ctrl() || parsed.meta() || parsed.key() == "Escape")
}

// =============================================================================
// REGISTRATIONS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hotkey_{}", self.0)
    }
}

/// One entry of the registration table.
pub struct HotkeyRegistration {
    id: RegistrationId,
    hotkey: String,
    canonical: String,
    parsed_hotkey: ParsedHotkey,
    target: Target,
    callback: RefCell<HotkeyCallback>,
    options: RefCell<ResolvedHotkeyOptions>,
    has_fired: Cell<bool>,
    trigger_count: Cell<u64>,
}

impl HotkeyRegistration {
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// The descriptor as registered.
    pub fn hotkey(&self) -> &str {
        &self.hotkey
    }

    /// Normalized form used for conflict detection.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn parsed_hotkey(&self) -> &ParsedHotkey {
        &self.parsed_hotkey
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn options(&self) -> ResolvedHotkeyOptions {
        *self.options.borrow()
    }

    /// Set after a `require_reset` hotkey fires, cleared on release.
    pub fn has_fired(&self) -> bool {
        self.has_fired.get()
    }

    pub fn trigger_count(&self) -> u64 {
        self.trigger_count.get()
    }

    pub fn callback(&self) -> HotkeyCallback {
        Rc::clone(&self.callback.borrow())
    }

    pub(crate) fn set_callback(&self, callback: HotkeyCallback) {
        *self.callback.borrow_mut() = callback;
    }

    fn context(&self) -> HotkeyCallbackContext {
        HotkeyCallbackContext {
            hotkey: self.hotkey.clone(),
            parsed_hotkey: self.parsed_hotkey.clone(),
        }
    }

    /// True when releasing `event.key` breaks this chord: the main key
    /// (single characters fold case) or one of its required modifiers.
    fn should_reset(&self, event: &KeyboardEvent) -> bool {
        let released = normalize_key_name(event.key());
        let parsed = &self.parsed_hotkey;

        if fold_single_char(&released) == fold_single_char(parsed.key()) {
            return true;
        }

        match released.as_str() {
            "Control" => parsed.ctrl(),
            "Shift" => parsed.shift(),
            "Alt" => parsed.alt(),
            "Meta" => parsed.meta(),
            _ => false,
        }
    }
}

fn fold_single_char(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_uppercase()
    } else {
        key.to_string()
    }
}

impl fmt::Debug for HotkeyRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRegistration")
            .field("id", &self.id)
            .field("hotkey", &self.hotkey)
            .field("target", &self.target)
            .field("options", &self.options.borrow())
            .field("has_fired", &self.has_fired.get())
            .field("trigger_count", &self.trigger_count.get())
            .finish_non_exhaustive()
    }
}

/// Published snapshot of every live registration, in registration order.
pub type RegistrationTable = Vec<Rc<HotkeyRegistration>>;

// =============================================================================
// MANAGER
// =============================================================================

struct TargetEntry {
    target: Target,
    registrations: Vec<RegistrationId>,
    listeners: Option<(ListenerId, ListenerId)>,
}

struct ManagerInner {
    dom: Option<Dom>,
    platform: Platform,
    defaults: HotkeyOptions,
    registrations: Store<RegistrationTable>,
    targets: RefCell<Vec<TargetEntry>>,
    next_id: Cell<u64>,
}

impl ManagerInner {
    fn get(&self, id: RegistrationId) -> Option<Rc<HotkeyRegistration>> {
        self.registrations
            .state()
            .iter()
            .find(|registration| registration.id == id)
            .cloned()
    }

    fn is_live(&self, id: RegistrationId) -> bool {
        self.registrations
            .state()
            .iter()
            .any(|registration| registration.id == id)
    }

    /// Republish the table so observers see in-place mutations.
    fn touch(&self) {
        self.registrations.set_state(|table| table.clone());
    }

    fn unregister(&self, id: RegistrationId) {
        let Some(registration) = self.get(id) else {
            return;
        };

        self.registrations
            .set_state(|table| table.iter().filter(|r| r.id != id).cloned().collect());

        let mut detach = None;
        {
            let mut targets = self.targets.borrow_mut();
            if let Some(index) = targets
                .iter()
                .position(|entry| entry.target == registration.target)
            {
                targets[index].registrations.retain(|existing| *existing != id);
                if targets[index].registrations.is_empty() {
                    detach = Some(targets.remove(index));
                }
            }
        }
        if let Some(entry) = detach {
            self.detach(entry);
        }

        debug!(
            registration_id = %id,
            hotkey = %registration.hotkey,
            "Unregistered hotkey"
        );
    }

    fn detach(&self, entry: TargetEntry) {
        if let (Some(dom), Some((keydown, keyup))) = (&self.dom, entry.listeners) {
            dom.remove_listener(keydown);
            dom.remove_listener(keyup);
            debug!(target = %entry.target, "Detached hotkey listeners");
        }
    }

    fn process_target_event(&self, target: &Target, event: &KeyboardEvent) {
        let table = self.registrations.state();

        for registration in table.iter().filter(|r| &r.target == target) {
            // Removed by an earlier callback of this dispatch.
            if !self.is_live(registration.id) {
                continue;
            }
            if !is_event_for_target(event, target) {
                continue;
            }

            let options = registration.options();
            if !options.enabled {
                continue;
            }

            if options.ignore_inputs {
                if let Some(origin) = event.target() {
                    if origin.is_input_like() && registration.target.as_element() != Some(origin) {
                        continue;
                    }
                }
            }

            match event.event_type() {
                KeyEventType::KeyDown => {
                    if options.event_type != KeyEventType::KeyDown
                        || !matches_keyboard_event(event, &registration.parsed_hotkey)
                    {
                        continue;
                    }

                    apply_event_effects(&options, event);
                    if options.require_reset && registration.has_fired.get() {
                        trace!(registration_id = %registration.id, "Held hotkey suppressed");
                        continue;
                    }

                    self.execute(registration, event);
                    if options.require_reset {
                        registration.has_fired.set(true);
                    }
                }
                KeyEventType::KeyUp => {
                    if options.event_type == KeyEventType::KeyUp
                        && matches_keyboard_event(event, &registration.parsed_hotkey)
                    {
                        apply_event_effects(&options, event);
                        self.execute(registration, event);
                    }

                    if options.require_reset
                        && registration.has_fired.get()
                        && registration.should_reset(event)
                    {
                        registration.has_fired.set(false);
                    }
                }
            }
        }
    }

    fn execute(&self, registration: &HotkeyRegistration, event: &KeyboardEvent) {
        registration
            .trigger_count
            .set(registration.trigger_count.get() + 1);
        self.touch();

        debug!(
            registration_id = %registration.id,
            hotkey = %registration.hotkey,
            event_type = %event.event_type(),
            "Hotkey triggered"
        );

        let callback = registration.callback();
        callback(event, &registration.context());
    }
}

impl Drop for ManagerInner {
    fn drop(&mut self) {
        for entry in self.targets.take() {
            self.detach(entry);
        }
    }
}

fn apply_event_effects(options: &ResolvedHotkeyOptions, event: &KeyboardEvent) {
    if options.prevent_default {
        event.prevent_default();
    }
    if options.stop_propagation {
        event.stop_propagation();
    }
}

/// Document and window need an exact `current_target`; elements also
/// accept events bubbling up from a descendant.
fn is_event_for_target(event: &KeyboardEvent, target: &Target) -> bool {
    let current = event.current_target();
    match target {
        Target::Document | Target::Window => current.as_ref() == Some(target),
        Target::Element(element) => {
            current.as_ref() == Some(target)
                || event.target().is_some_and(|origin| element.contains(origin))
        }
    }
}

/// Owns the registration table. Clones share state.
#[derive(Clone)]
pub struct HotkeyManager {
    inner: Rc<ManagerInner>,
}

impl HotkeyManager {
    pub fn new(dom: &Dom) -> Self {
        Self::with_settings(Some(dom), Platform::current(), HotkeyOptions::default())
    }

    /// A manager with no event host. Registrations without an explicit
    /// target return inert handles.
    pub fn headless() -> Self {
        Self::with_settings(None, Platform::current(), HotkeyOptions::default())
    }

    /// `defaults` sit beneath every `register` call's own options.
    pub fn with_settings(dom: Option<&Dom>, platform: Platform, defaults: HotkeyOptions) -> Self {
        Self {
            inner: Rc::new(ManagerInner {
                dom: dom.cloned(),
                platform,
                defaults,
                registrations: Store::default(),
                targets: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn platform(&self) -> Platform {
        self.inner.platform
    }

    /// Observable registration table.
    pub fn registrations(&self) -> &Store<RegistrationTable> {
        &self.inner.registrations
    }

    /// Bind `callback` to `hotkey`.
    ///
    /// Fails only with [`HotkeyError::Conflict`] under
    /// [`ConflictBehavior::Error`].
    pub fn register<F>(
        &self,
        hotkey: impl Into<RegisterableHotkey>,
        callback: F,
        options: HotkeyOptions,
    ) -> Result<HotkeyRegistrationHandle>
    where
        F: Fn(&KeyboardEvent, &HotkeyCallbackContext) + 'static,
    {
        let options = options.merged_over(&self.inner.defaults);
        let hotkey: RegisterableHotkey = hotkey.into();
        let callback: HotkeyCallback = Rc::new(callback);
        let platform = options.platform.unwrap_or(self.inner.platform);
        let (parsed_hotkey, hotkey_text) = resolve_registerable(&hotkey, platform);

        if self.inner.dom.is_none() && options.target.is_none() {
            debug!(hotkey = %hotkey_text, "No event host, returning inert handle");
            return Ok(HotkeyRegistrationHandle::inert(
                hotkey_text,
                parsed_hotkey,
                callback,
                &options,
                platform,
            ));
        }

        let target = options.target.clone().unwrap_or(Target::Document);
        let canonical = format_hotkey(&parsed_hotkey);
        let resolved = ResolvedHotkeyOptions::resolve(&options, &parsed_hotkey, platform);

        let conflict = self
            .inner
            .registrations
            .state()
            .iter()
            .find(|r| r.canonical == canonical && r.target == target)
            .map(|r| r.id);

        if let Some(existing) = conflict {
            match resolved.conflict_behavior {
                ConflictBehavior::Allow => {}
                ConflictBehavior::Warn => {
                    warn!(
                        existing = %existing,
                        target = %target,
                        "Hotkey '{}' is already registered. Multiple handlers will be triggered. \
                         Use ConflictBehavior::Replace to replace the existing handler, \
                         or ConflictBehavior::Allow to suppress this warning.",
                        hotkey_text
                    );
                }
                ConflictBehavior::Error => {
                    return Err(HotkeyError::Conflict {
                        hotkey: hotkey_text,
                    });
                }
                ConflictBehavior::Replace => {
                    debug!(existing = %existing, hotkey = %hotkey_text, "Replacing conflicting hotkey");
                    self.inner.unregister(existing);
                }
            }
        }

        let id = RegistrationId(self.inner.next_id.get() + 1);
        self.inner.next_id.set(id.0);

        let registration = Rc::new(HotkeyRegistration {
            id,
            hotkey: hotkey_text,
            canonical,
            parsed_hotkey,
            target: target.clone(),
            callback: RefCell::new(callback),
            options: RefCell::new(resolved),
            has_fired: Cell::new(false),
            trigger_count: Cell::new(0),
        });

        self.inner.registrations.set_state(|table| {
            let mut next = table.clone();
            next.push(Rc::clone(&registration));
            next
        });
        self.track(&target, id);

        debug!(
            registration_id = %id,
            hotkey = %registration.hotkey,
            target = %target,
            event_type = %resolved.event_type,
            "Registered hotkey"
        );

        Ok(HotkeyRegistrationHandle {
            id,
            registration: Rc::downgrade(&registration),
            detached: None,
            manager: Rc::downgrade(&self.inner),
        })
    }

    /// Record `id` under `target`, attaching its listener pair on first use.
    fn track(&self, target: &Target, id: RegistrationId) {
        let mut targets = self.inner.targets.borrow_mut();
        if let Some(entry) = targets.iter_mut().find(|entry| &entry.target == target) {
            entry.registrations.push(id);
            return;
        }

        let listeners = self.inner.dom.as_ref().map(|dom| {
            let keydown = {
                let weak = Rc::downgrade(&self.inner);
                let scope = target.clone();
                dom.add_key_listener(target.clone(), KeyEventType::KeyDown, move |event| {
                    if let Some(inner) = weak.upgrade() {
                        inner.process_target_event(&scope, event);
                    }
                })
            };
            let keyup = {
                let weak = Rc::downgrade(&self.inner);
                let scope = target.clone();
                dom.add_key_listener(target.clone(), KeyEventType::KeyUp, move |event| {
                    if let Some(inner) = weak.upgrade() {
                        inner.process_target_event(&scope, event);
                    }
                })
            };
            debug!(target = %target, "Attached hotkey listeners");
            (keydown, keyup)
        });

        targets.push(TargetEntry {
            target: target.clone(),
            registrations: vec![id],
            listeners,
        });
    }

    /// True if `hotkey` (normalized for each registration's platform) is
    /// bound, on `target` when given, or on any target otherwise.
    pub fn is_registered(&self, hotkey: &str, target: Option<&Target>) -> bool {
        self.inner.registrations.state().iter().any(|registration| {
            registration.canonical == normalize_hotkey(hotkey, registration.options().platform)
                && target.map_or(true, |target| &registration.target == target)
        })
    }

    pub fn registration_count(&self) -> usize {
        self.inner.registrations.state().len()
    }

    pub fn get_registration(&self, id: RegistrationId) -> Option<Rc<HotkeyRegistration>> {
        self.inner.get(id)
    }

    /// Fire a registration's callback with a synthetic event built from its
    /// parsed hotkey, bypassing every filter. False if `id` is unknown.
    pub fn trigger_registration(&self, id: RegistrationId) -> bool {
        let Some(registration) = self.inner.get(id) else {
            return false;
        };

        let parsed = &registration.parsed_hotkey;
        let event = KeyboardEvent::new(registration.options().event_type, parsed.key())
            .ctrl(parsed.ctrl())
            .shift(parsed.shift())
            .alt(parsed.alt())
            .meta(parsed.meta());

        registration
            .trigger_count
            .set(registration.trigger_count.get() + 1);
        self.inner.touch();

        debug!(registration_id = %id, "Hotkey triggered manually");
        let callback = registration.callback();
        callback(&event, &registration.context());
        true
    }

    /// Remove every registration and detach every listener.
    pub fn close(&self) {
        let entries = self.inner.targets.take();
        for entry in entries {
            self.inner.detach(entry);
        }
        self.inner.registrations.set_state(|_| Vec::new());
        debug!("Hotkey manager closed");
    }
}

impl fmt::Debug for HotkeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyManager")
            .field("platform", &self.inner.platform)
            .field("registrations", &self.registration_count())
            .field("targets", &self.inner.targets.borrow().len())
            .finish()
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Returned by [`HotkeyManager::register`].
///
/// Dropping the handle does not unregister; call
/// [`unregister`](Self::unregister). The handle only holds the table entry
/// weakly, so a callback may capture its own handle without keeping the
/// registration alive after it is unregistered.
#[derive(Clone)]
pub struct HotkeyRegistrationHandle {
    id: RegistrationId,
    registration: Weak<HotkeyRegistration>,
    /// Owned entry for handles whose registration was never stored
    detached: Option<Rc<HotkeyRegistration>>,
    manager: Weak<ManagerInner>,
}

impl HotkeyRegistrationHandle {
    /// Handle for a registration that was never stored.
    fn inert(
        hotkey: String,
        parsed_hotkey: ParsedHotkey,
        callback: HotkeyCallback,
        options: &HotkeyOptions,
        platform: Platform,
    ) -> Self {
        let resolved = ResolvedHotkeyOptions::resolve(options, &parsed_hotkey, platform);
        Self {
            id: RegistrationId::default(),
            registration: Weak::new(),
            detached: Some(Rc::new(HotkeyRegistration {
                id: RegistrationId::default(),
                canonical: format_hotkey(&parsed_hotkey),
                hotkey,
                parsed_hotkey,
                target: Target::Document,
                callback: RefCell::new(callback),
                options: RefCell::new(resolved),
                has_fired: Cell::new(false),
                trigger_count: Cell::new(0),
            })),
            manager: Weak::new(),
        }
    }

    fn entry(&self) -> Option<Rc<HotkeyRegistration>> {
        self.registration
            .upgrade()
            .or_else(|| self.detached.clone())
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// The callback currently stored on the registration. `None` once the
    /// registration has been unregistered and dropped.
    pub fn callback(&self) -> Option<HotkeyCallback> {
        self.entry().map(|registration| registration.callback())
    }

    /// Swap the callback in place. The next matching event calls the new
    /// one; no re-registration happens.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&KeyboardEvent, &HotkeyCallbackContext) + 'static,
    {
        if let Some(registration) = self.entry() {
            registration.set_callback(Rc::new(callback));
        }
    }

    /// Merge `options` into the stored ones. No-op once unregistered.
    pub fn set_options(&self, options: HotkeyOptions) {
        let Some(manager) = self.manager.upgrade() else {
            return;
        };
        let Some(registration) = manager.get(self.id) else {
            return;
        };
        registration.options.borrow_mut().apply(&options);
        manager.touch();
    }

    /// Safe to call repeatedly or after the manager is gone.
    pub fn unregister(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.unregister(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.manager
            .upgrade()
            .is_some_and(|manager| manager.is_live(self.id))
    }
}

impl fmt::Debug for HotkeyRegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRegistrationHandle")
            .field("id", &self.id)
            .field("hotkey", &self.entry().map(|r| r.hotkey.clone()))
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
