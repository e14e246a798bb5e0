use super::*;
use crate::dom::{Element, EventType};
use crate::hotkey::RawHotkey;
use crate::test_support::capture_logs;

fn setup() -> (Dom, HotkeyManager) {
    let dom = Dom::new();
    let manager = HotkeyManager::with_settings(Some(&dom), Platform::Linux, HotkeyOptions::default());
    (dom, manager)
}

fn counter() -> (Rc<Cell<u32>>, impl Fn(&KeyboardEvent, &HotkeyCallbackContext)) {
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    (count, move |_: &KeyboardEvent, _: &HotkeyCallbackContext| {
        sink.set(sink.get() + 1)
    })
}

fn press(dom: &Dom, event: KeyboardEvent) -> KeyboardEvent {
    dom.dispatch_key_event(&event);
    event
}

#[test]
fn test_register_fires_on_matching_keydown() {
    let (dom, manager) = setup();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    manager
        .register(
            "Mod+S",
            move |_, ctx: &HotkeyCallbackContext| *sink.borrow_mut() = Some(ctx.clone()),
            HotkeyOptions::new(),
        )
        .unwrap();

    let event = press(&dom, KeyboardEvent::key_down("s").ctrl(true));

    let ctx = seen.borrow().clone().expect("callback should fire");
    assert_eq!(ctx.hotkey, "Mod+S");
    assert_eq!(ctx.parsed_hotkey, ParsedHotkey::new("S", true, false, false, false));
    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
}

#[test]
fn test_non_matching_event_leaves_event_untouched() {
    let (dom, manager) = setup();
    let (count, callback) = counter();
    manager.register("Mod+S", callback, HotkeyOptions::new()).unwrap();

    let event = press(&dom, KeyboardEvent::key_down("s").ctrl(true).shift(true));

    assert_eq!(count.get(), 0);
    assert!(!event.default_prevented());
}

#[test]
fn test_one_listener_pair_per_target() {
    let (dom, manager) = setup();
    let a = manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
    let b = manager.register("B", |_, _| {}, HotkeyOptions::new()).unwrap();

    assert_eq!(dom.listener_count(&Target::Document, EventType::KeyDown), 1);
    assert_eq!(dom.listener_count(&Target::Document, EventType::KeyUp), 1);

    a.unregister();
    assert_eq!(dom.listener_count(&Target::Document, EventType::KeyDown), 1);

    b.unregister();
    assert_eq!(dom.total_listener_count(), 0);
}

#[test]
fn test_unregister_is_idempotent() {
    let (_dom, manager) = setup();
    let handle = manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
    assert!(handle.is_active());

    handle.unregister();
    handle.unregister();

    assert!(!handle.is_active());
    assert_eq!(manager.registration_count(), 0);
}

#[test]
fn test_registration_ids_are_sequential() {
    let (_dom, manager) = setup();
    let first = manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
    let second = manager.register("B", |_, _| {}, HotkeyOptions::new()).unwrap();

    assert_eq!(first.id().to_string(), "hotkey_1");
    assert_eq!(second.id().to_string(), "hotkey_2");
}

#[test]
fn test_conflict_warn_registers_both() {
    let (dom, manager) = setup();
    let (first, first_cb) = counter();
    let (second, second_cb) = counter();
    manager.register("Mod+K", first_cb, HotkeyOptions::new()).unwrap();

    let (result, logs) = capture_logs(|| {
        manager.register("Control+K", second_cb, HotkeyOptions::new().stop_propagation(false))
    });
    assert!(result.is_ok());
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("already registered"), "{logs}");

    press(&dom, KeyboardEvent::key_down("k").ctrl(true));
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 1);
}

#[test]
fn test_conflict_error_leaves_table_unchanged() {
    let (_dom, manager) = setup();
    manager.register("Mod+K", |_, _| {}, HotkeyOptions::new()).unwrap();

    let result = manager.register(
        "Mod+K",
        |_, _| {},
        HotkeyOptions::new().conflict_behavior(ConflictBehavior::Error),
    );

    assert!(matches!(result, Err(HotkeyError::Conflict { ref hotkey }) if hotkey == "Mod+K"));
    assert_eq!(manager.registration_count(), 1);
}

#[test]
fn test_conflict_replace_evicts_previous() {
    let (dom, manager) = setup();
    let (old, old_cb) = counter();
    let (new, new_cb) = counter();
    let old_handle = manager.register("Escape", old_cb, HotkeyOptions::new()).unwrap();
    manager
        .register(
            "Esc",
            new_cb,
            HotkeyOptions::new().conflict_behavior(ConflictBehavior::Replace),
        )
        .unwrap();

    assert!(!old_handle.is_active());
    assert_eq!(manager.registration_count(), 1);
    assert_eq!(dom.listener_count(&Target::Document, EventType::KeyDown), 1);

    press(&dom, KeyboardEvent::key_down("Escape"));
    assert_eq!(old.get(), 0);
    assert_eq!(new.get(), 1);
}

#[test]
fn test_conflict_allow_is_silent() {
    let (_dom, manager) = setup();
    manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();

    let (result, logs) = capture_logs(|| {
        manager.register(
            "A",
            |_, _| {},
            HotkeyOptions::new().conflict_behavior(ConflictBehavior::Allow),
        )
    });

    assert!(result.is_ok());
    assert!(!logs.contains("WARN"), "{logs}");
    assert_eq!(manager.registration_count(), 2);
}

#[test]
fn test_same_hotkey_on_different_targets_is_not_a_conflict() {
    let (_dom, manager) = setup();
    let panel = Element::new("div");
    manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();

    let result = manager.register(
        "A",
        |_, _| {},
        HotkeyOptions::new()
            .target(&panel)
            .conflict_behavior(ConflictBehavior::Error),
    );

    assert!(result.is_ok());
}

#[test]
fn test_plain_keys_are_suppressed_in_inputs() {
    let (dom, manager) = setup();
    let input = Element::input("text");
    let (count, callback) = counter();
    manager.register("K", callback, HotkeyOptions::new()).unwrap();

    press(&dom, KeyboardEvent::key_down("k").on(&input));
    assert_eq!(count.get(), 0);

    press(&dom, KeyboardEvent::key_down("k"));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_modifier_shortcuts_and_escape_fire_in_inputs() {
    let (dom, manager) = setup();
    let textarea = Element::new("textarea");
    let (saves, save_cb) = counter();
    let (escapes, escape_cb) = counter();
    let (shifted, shifted_cb) = counter();
    manager.register("Mod+S", save_cb, HotkeyOptions::new()).unwrap();
    manager.register("Escape", escape_cb, HotkeyOptions::new()).unwrap();
    manager.register("Shift+K", shifted_cb, HotkeyOptions::new()).unwrap();

    press(&dom, KeyboardEvent::key_down("s").ctrl(true).on(&textarea));
    press(&dom, KeyboardEvent::key_down("Escape").on(&textarea));
    press(&dom, KeyboardEvent::key_down("K").shift(true).on(&textarea));

    assert_eq!(saves.get(), 1);
    assert_eq!(escapes.get(), 1);
    assert_eq!(shifted.get(), 0);
}

#[test]
fn test_explicit_ignore_inputs_overrides_default() {
    let (dom, manager) = setup();
    let editable = Element::new("div");
    editable.set_content_editable("true");
    let (plain, plain_cb) = counter();
    let (save, save_cb) = counter();
    manager
        .register("K", plain_cb, HotkeyOptions::new().ignore_inputs(false))
        .unwrap();
    manager
        .register("Mod+S", save_cb, HotkeyOptions::new().ignore_inputs(true))
        .unwrap();

    press(&dom, KeyboardEvent::key_down("k").on(&editable));
    press(&dom, KeyboardEvent::key_down("s").ctrl(true).on(&editable));

    assert_eq!(plain.get(), 1);
    assert_eq!(save.get(), 0);
}

#[test]
fn test_button_inputs_are_not_input_like() {
    let (dom, manager) = setup();
    let submit = Element::input("submit");
    let (count, callback) = counter();
    manager.register("K", callback, HotkeyOptions::new()).unwrap();

    press(&dom, KeyboardEvent::key_down("k").on(&submit));

    assert_eq!(count.get(), 1);
}

#[test]
fn test_hotkey_scoped_to_input_fires_on_it() {
    let (dom, manager) = setup();
    let input = Element::input("search");
    let (count, callback) = counter();
    manager
        .register("K", callback, HotkeyOptions::new().target(&input))
        .unwrap();

    press(&dom, KeyboardEvent::key_down("k").on(&input));

    assert_eq!(count.get(), 1);
}

#[test]
fn test_element_target_sees_bubbled_events_only() {
    let (dom, manager) = setup();
    let panel = Element::new("div");
    let button = Element::new("button");
    let elsewhere = Element::new("div");
    panel.append_child(&button);

    let (count, callback) = counter();
    manager
        .register("J", callback, HotkeyOptions::new().target(&panel))
        .unwrap();
    assert_eq!(dom.listener_count(&Target::from(&panel), EventType::KeyDown), 1);
    assert_eq!(dom.listener_count(&Target::Document, EventType::KeyDown), 0);

    press(&dom, KeyboardEvent::key_down("j").on(&button));
    press(&dom, KeyboardEvent::key_down("j").on(&elsewhere));
    press(&dom, KeyboardEvent::key_down("j"));

    assert_eq!(count.get(), 1);
}

#[test]
fn test_scoped_hotkey_stops_document_hotkey() {
    let (dom, manager) = setup();
    let panel = Element::new("div");
    let (scoped, scoped_cb) = counter();
    let (global, global_cb) = counter();
    manager.register("J", global_cb, HotkeyOptions::new()).unwrap();
    manager
        .register("J", scoped_cb, HotkeyOptions::new().target(&panel))
        .unwrap();

    press(&dom, KeyboardEvent::key_down("j").on(&panel));

    assert_eq!(scoped.get(), 1);
    assert_eq!(global.get(), 0);
}

#[test]
fn test_keyup_registration() {
    let (dom, manager) = setup();
    let (count, callback) = counter();
    manager
        .register(
            "Space",
            callback,
            HotkeyOptions::new().event_type(KeyEventType::KeyUp),
        )
        .unwrap();

    let down = press(&dom, KeyboardEvent::key_down(" "));
    assert_eq!(count.get(), 0);
    assert!(!down.default_prevented());

    let up = press(&dom, KeyboardEvent::key_up(" "));
    assert_eq!(count.get(), 1);
    assert!(up.default_prevented());
}

#[test]
fn test_require_reset_fires_once_per_press() {
    let (dom, manager) = setup();
    let (count, callback) = counter();
    let handle = manager
        .register("Mod+S", callback, HotkeyOptions::new().require_reset(true))
        .unwrap();

    press(&dom, KeyboardEvent::key_down("s").ctrl(true));
    let repeat = press(&dom, KeyboardEvent::key_down("s").ctrl(true));
    assert_eq!(count.get(), 1);
    assert!(repeat.default_prevented(), "matched repeats are still swallowed");

    let registration = manager.get_registration(handle.id()).unwrap();
    assert!(registration.has_fired());

    press(&dom, KeyboardEvent::key_up("x"));
    assert!(registration.has_fired());

    press(&dom, KeyboardEvent::key_up("Control"));
    assert!(!registration.has_fired());

    press(&dom, KeyboardEvent::key_down("s").ctrl(true));
    assert_eq!(count.get(), 2);
}

#[test]
fn test_require_reset_clears_on_main_key_release_any_case() {
    let (dom, manager) = setup();
    let (count, callback) = counter();
    manager
        .register("Shift+A", callback, HotkeyOptions::new().require_reset(true))
        .unwrap();

    press(&dom, KeyboardEvent::key_down("A").shift(true));
    press(&dom, KeyboardEvent::key_up("a"));
    press(&dom, KeyboardEvent::key_down("A").shift(true));

    assert_eq!(count.get(), 2);
}

#[test]
fn test_set_options_disables_registration() {
    let (dom, manager) = setup();
    let (count, callback) = counter();
    let handle = manager.register("A", callback, HotkeyOptions::new()).unwrap();

    handle.set_options(HotkeyOptions::new().enabled(false));
    press(&dom, KeyboardEvent::key_down("a"));
    assert_eq!(count.get(), 0);
    assert!(!manager.get_registration(handle.id()).unwrap().options().enabled);

    handle.set_options(HotkeyOptions::new().enabled(true));
    press(&dom, KeyboardEvent::key_down("a"));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_set_callback_replaces_in_place() {
    let (dom, manager) = setup();
    let (old, old_cb) = counter();
    let (new, new_cb) = counter();
    let handle = manager.register("A", old_cb, HotkeyOptions::new()).unwrap();

    handle.set_callback(new_cb);
    press(&dom, KeyboardEvent::key_down("a"));

    assert_eq!(old.get(), 0);
    assert_eq!(new.get(), 1);
    assert_eq!(manager.registration_count(), 1);
}

#[test]
fn test_callback_may_unregister_itself() {
    let (dom, manager) = setup();
    let slot: Rc<RefCell<Option<HotkeyRegistrationHandle>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let handle = manager
        .register(
            "A",
            move |_, _| {
                if let Some(handle) = inner.borrow().as_ref() {
                    handle.unregister();
                }
            },
            HotkeyOptions::new(),
        )
        .unwrap();
    *slot.borrow_mut() = Some(handle.clone());

    press(&dom, KeyboardEvent::key_down("a"));

    assert!(!handle.is_active());
    assert_eq!(dom.total_listener_count(), 0);
}

#[test]
fn test_self_capturing_callback_is_freed_on_unregister() {
    let (dom, manager) = setup();
    let slot: Rc<RefCell<Option<HotkeyRegistrationHandle>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    let handle = manager
        .register(
            "A",
            move |_, _| {
                if inner.borrow().as_ref().is_some_and(|h| h.is_active()) {
                    sink.set(sink.get() + 1);
                }
            },
            HotkeyOptions::new(),
        )
        .unwrap();
    *slot.borrow_mut() = Some(handle.clone());
    let weak_slot = Rc::downgrade(&slot);
    drop(slot);

    press(&dom, KeyboardEvent::key_down("a"));
    assert_eq!(count.get(), 1);
    assert!(handle.callback().is_some());

    handle.unregister();

    assert!(handle.registration.upgrade().is_none());
    assert!(weak_slot.upgrade().is_none());
    assert!(handle.callback().is_none());
    handle.set_callback(|_, _| {});
}

#[test]
fn test_trigger_registration_bypasses_filters() {
    let (_dom, manager) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handle = manager
        .register(
            "Mod+Shift+P",
            move |event: &KeyboardEvent, _: &HotkeyCallbackContext| {
                sink.borrow_mut()
                    .push((event.key().to_string(), event.ctrl_key(), event.shift_key()))
            },
            HotkeyOptions::new().enabled(false),
        )
        .unwrap();

    assert!(manager.trigger_registration(handle.id()));
    assert_eq!(*seen.borrow(), vec![("P".to_string(), true, true)]);
    assert_eq!(manager.get_registration(handle.id()).unwrap().trigger_count(), 1);

    handle.unregister();
    assert!(!manager.trigger_registration(handle.id()));
}

#[test]
fn test_triggers_republish_table() {
    let (dom, manager) = setup();
    let handle = manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
    let before = manager.registrations().state();

    let publishes = Rc::new(Cell::new(0));
    let sink = Rc::clone(&publishes);
    manager
        .registrations()
        .subscribe(move |_| sink.set(sink.get() + 1));

    press(&dom, KeyboardEvent::key_down("a"));

    let after = manager.registrations().state();
    assert_eq!(publishes.get(), 1);
    assert!(!Rc::ptr_eq(&before, &after));
    assert!(Rc::ptr_eq(&before[0], &after[0]));
    assert_eq!(after[0].trigger_count(), 1);
    assert_eq!(after[0].id(), handle.id());
}

#[test]
fn test_is_registered_normalizes() {
    let (_dom, manager) = setup();
    let panel = Element::new("div");
    manager
        .register("ctrl+shift+s", |_, _| {}, HotkeyOptions::new().target(&panel))
        .unwrap();

    assert!(manager.is_registered("Control+Shift+S", None));
    assert!(manager.is_registered("Mod+Shift+S", Some(&Target::from(&panel))));
    assert!(!manager.is_registered("Control+Shift+S", Some(&Target::Document)));
    assert!(!manager.is_registered("Control+S", None));
}

#[test]
fn test_raw_hotkey_registration() {
    let (dom, manager) = setup();
    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    manager
        .register(
            RawHotkey::new("Enter").with_mod().shift(),
            move |_, ctx: &HotkeyCallbackContext| *sink.borrow_mut() = ctx.hotkey.clone(),
            HotkeyOptions::new(),
        )
        .unwrap();

    press(&dom, KeyboardEvent::key_down("Enter").ctrl(true).shift(true));

    assert_eq!(*seen.borrow(), "Control+Shift+Enter");
}

#[test]
fn test_platform_option_resolves_mod() {
    let (dom, manager) = setup();
    let (count, callback) = counter();
    manager
        .register("Mod+S", callback, HotkeyOptions::new().platform(Platform::Mac))
        .unwrap();

    press(&dom, KeyboardEvent::key_down("s").ctrl(true));
    press(&dom, KeyboardEvent::key_down("s").meta(true));

    assert_eq!(count.get(), 1);
}

#[test]
fn test_manager_defaults_sit_beneath_call_options() {
    let dom = Dom::new();
    let manager = HotkeyManager::with_settings(
        Some(&dom),
        Platform::Linux,
        HotkeyOptions::new().prevent_default(false),
    );
    manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
    manager
        .register("B", |_, _| {}, HotkeyOptions::new().prevent_default(true))
        .unwrap();

    assert!(!press(&dom, KeyboardEvent::key_down("a")).default_prevented());
    assert!(press(&dom, KeyboardEvent::key_down("b")).default_prevented());
}

#[test]
fn test_headless_manager_returns_inert_handle() {
    let manager = HotkeyManager::headless();
    let (count, callback) = counter();
    let handle = manager.register("A", callback, HotkeyOptions::new()).unwrap();

    assert!(!handle.is_active());
    assert_eq!(manager.registration_count(), 0);
    handle.set_options(HotkeyOptions::new().enabled(false));
    handle.unregister();

    let callback = handle.callback().unwrap();
    callback(&KeyboardEvent::key_down("a"), &HotkeyCallbackContext {
        hotkey: "A".into(),
        parsed_hotkey: ParsedHotkey::new("A", false, false, false, false),
    });
    assert_eq!(count.get(), 1);
}

#[test]
fn test_headless_manager_with_explicit_target_registers() {
    let manager = HotkeyManager::headless();
    let panel = Element::new("div");
    let (count, callback) = counter();
    let handle = manager
        .register("A", callback, HotkeyOptions::new().target(&panel))
        .unwrap();

    assert!(handle.is_active());
    assert!(manager.trigger_registration(handle.id()));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_close_detaches_everything() {
    let (dom, manager) = setup();
    let panel = Element::new("div");
    let handle = manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
    manager
        .register("B", |_, _| {}, HotkeyOptions::new().target(&panel))
        .unwrap();
    assert_eq!(dom.total_listener_count(), 4);

    manager.close();

    assert_eq!(dom.total_listener_count(), 0);
    assert_eq!(manager.registration_count(), 0);
    assert!(!handle.is_active());
    handle.unregister();
}

#[test]
fn test_dropping_manager_detaches_listeners() {
    let dom = Dom::new();
    {
        let manager = HotkeyManager::new(&dom);
        manager.register("A", |_, _| {}, HotkeyOptions::new()).unwrap();
        assert_eq!(dom.total_listener_count(), 2);
    }
    assert_eq!(dom.total_listener_count(), 0);
}
