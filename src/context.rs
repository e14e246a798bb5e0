//! Composition root: one event host with its managers, configured once.

use std::fmt;

use crate::config::HotkeysConfig;
use crate::dom::Dom;
use crate::key_state::KeyStateTracker;
use crate::manager::HotkeyManager;
use crate::recorder::{HotkeyRecorder, HotkeyRecorderOptions};
use crate::sequence::SequenceManager;

/// Owns the [`Dom`], a [`HotkeyManager`], a [`SequenceManager`] and a
/// [`KeyStateTracker`], all sharing the config's platform and defaults.
///
/// ```
/// use hotkeys::config::HotkeysConfig;
/// use hotkeys::context::HotkeysContext;
/// use hotkeys::dom::KeyboardEvent;
/// use hotkeys::manager::HotkeyOptions;
///
/// let ctx = HotkeysContext::new(HotkeysConfig::default());
/// let handle = ctx
///     .hotkey_manager()
///     .register("Escape", |_, _| {}, HotkeyOptions::new())
///     .unwrap();
///
/// ctx.dom().dispatch_key_event(&KeyboardEvent::key_down("Escape"));
/// assert_eq!(ctx.hotkey_manager().get_registration(handle.id()).unwrap().trigger_count(), 1);
/// ```
pub struct HotkeysContext {
    dom: Dom,
    config: HotkeysConfig,
    hotkey_manager: HotkeyManager,
    sequence_manager: SequenceManager,
    key_state_tracker: KeyStateTracker,
}

impl HotkeysContext {
    pub fn new(config: HotkeysConfig) -> Self {
        Self::with_dom(Dom::new(), config)
    }

    /// Attach to an existing host.
    pub fn with_dom(dom: Dom, config: HotkeysConfig) -> Self {
        let platform = config.platform();
        let hotkey_manager =
            HotkeyManager::with_settings(Some(&dom), platform, config.hotkey.to_options());
        let sequence_manager =
            SequenceManager::with_settings(&dom, platform, config.sequence.to_options());
        let key_state_tracker = KeyStateTracker::new(&dom);

        tracing::debug!(platform = %platform, "Hotkeys context created");

        Self {
            dom,
            config,
            hotkey_manager,
            sequence_manager,
            key_state_tracker,
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn config(&self) -> &HotkeysConfig {
        &self.config
    }

    pub fn hotkey_manager(&self) -> &HotkeyManager {
        &self.hotkey_manager
    }

    pub fn sequence_manager(&self) -> &SequenceManager {
        &self.sequence_manager
    }

    pub fn key_state_tracker(&self) -> &KeyStateTracker {
        &self.key_state_tracker
    }

    /// A recorder on this host. The configured recorder platform applies
    /// unless `options` sets one.
    pub fn recorder(&self, options: HotkeyRecorderOptions) -> HotkeyRecorder {
        let options = match options.platform {
            Some(_) => options,
            None => options.platform(self.config.recorder_platform()),
        };
        HotkeyRecorder::new(&self.dom, options)
    }

    /// Tear down every manager and detach their listeners.
    pub fn close(&self) {
        self.hotkey_manager.close();
        self.sequence_manager.close();
        self.key_state_tracker.close();
    }
}

impl fmt::Debug for HotkeysContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeysContext")
            .field("config", &self.config)
            .field("hotkey_manager", &self.hotkey_manager)
            .field("sequence_manager", &self.sequence_manager)
            .field("key_state_tracker", &self.key_state_tracker)
            .finish()
    }
}
