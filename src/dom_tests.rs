use super::*;

fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> impl Fn(&KeyboardEvent) {
    let log = Rc::clone(log);
    move |_event: &KeyboardEvent| log.borrow_mut().push(label.to_string())
}

#[test]
fn test_event_bubbles_from_element_to_window() {
    let dom = Dom::new();
    let outer = Element::new("div");
    let inner = Element::new("span");
    outer.append_child(&inner);

    let log = Rc::new(RefCell::new(Vec::new()));
    dom.add_key_listener(Target::Window, KeyEventType::KeyDown, recorder(&log, "window"));
    dom.add_key_listener(Target::Document, KeyEventType::KeyDown, recorder(&log, "document"));
    dom.add_key_listener(outer.clone().into(), KeyEventType::KeyDown, recorder(&log, "outer"));
    dom.add_key_listener(inner.clone().into(), KeyEventType::KeyDown, recorder(&log, "inner"));

    dom.dispatch_key_event(&KeyboardEvent::key_down("a").on(&inner));

    assert_eq!(*log.borrow(), vec!["inner", "outer", "document", "window"]);
}

#[test]
fn test_capture_runs_outside_in_before_bubble() {
    let dom = Dom::new();
    let outer = Element::new("div");
    let inner = Element::new("span");
    outer.append_child(&inner);

    let log = Rc::new(RefCell::new(Vec::new()));
    dom.add_key_listener(Target::Document, KeyEventType::KeyDown, recorder(&log, "document"));
    dom.add_key_listener(inner.clone().into(), KeyEventType::KeyDown, recorder(&log, "inner"));
    dom.add_capture_key_listener(inner.clone().into(), KeyEventType::KeyDown, recorder(&log, "capture inner"));
    dom.add_capture_key_listener(outer.clone().into(), KeyEventType::KeyDown, recorder(&log, "capture outer"));
    dom.add_capture_key_listener(Target::Window, KeyEventType::KeyDown, recorder(&log, "capture window"));

    dom.dispatch_key_event(&KeyboardEvent::key_down("a").on(&inner));

    assert_eq!(
        *log.borrow(),
        vec!["capture window", "capture outer", "capture inner", "inner", "document"]
    );
}

#[test]
fn test_stop_propagation_in_capture_skips_bubble() {
    let dom = Dom::new();
    let panel = Element::new("div");
    let log = Rc::new(RefCell::new(Vec::new()));

    dom.add_key_listener(panel.clone().into(), KeyEventType::KeyDown, recorder(&log, "panel"));
    dom.add_capture_key_listener(Target::Window, KeyEventType::KeyDown, |event| {
        event.stop_propagation()
    });
    dom.add_capture_key_listener(Target::Window, KeyEventType::KeyDown, recorder(&log, "window"));
    dom.add_capture_key_listener(Target::Document, KeyEventType::KeyDown, recorder(&log, "document"));

    let event = KeyboardEvent::key_down("a").on(&panel);
    dom.dispatch_key_event(&event);

    assert_eq!(*log.borrow(), vec!["window"]);
    assert_eq!(event.current_target(), None);
}

#[test]
fn test_stop_propagation_finishes_current_node_only() {
    let dom = Dom::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    dom.add_key_listener(Target::Document, KeyEventType::KeyDown, |event| {
        event.stop_propagation()
    });
    dom.add_key_listener(Target::Document, KeyEventType::KeyDown, recorder(&log, "second"));
    dom.add_key_listener(Target::Window, KeyEventType::KeyDown, recorder(&log, "window"));

    dom.dispatch_key_event(&KeyboardEvent::key_down("a"));

    assert_eq!(*log.borrow(), vec!["second"]);
}

#[test]
fn test_current_target_during_dispatch() {
    let dom = Dom::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    dom.add_key_listener(Target::Document, KeyEventType::KeyUp, move |event| {
        sink.borrow_mut().push(event.current_target())
    });

    let event = KeyboardEvent::key_up("a");
    dom.dispatch_key_event(&event);

    assert_eq!(*seen.borrow(), vec![Some(Target::Document)]);
    assert_eq!(event.current_target(), None);
}

#[test]
fn test_listener_removed_mid_dispatch_does_not_run() {
    let dom = Dom::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let second_id = Rc::new(Cell::new(None));
    let handle = Rc::clone(&second_id);
    let dom_clone = dom.clone();
    dom.add_key_listener(Target::Document, KeyEventType::KeyDown, move |_| {
        if let Some(id) = handle.get() {
            dom_clone.remove_listener(id);
        }
    });
    let id = dom.add_key_listener(Target::Document, KeyEventType::KeyDown, recorder(&log, "removed"));
    second_id.set(Some(id));

    dom.dispatch_key_event(&KeyboardEvent::key_down("a"));

    assert!(log.borrow().is_empty());
    assert_eq!(dom.listener_count(&Target::Document, EventType::KeyDown), 1);
}

#[test]
fn test_listener_kinds_are_separate() {
    let dom = Dom::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    dom.add_key_listener(Target::Document, KeyEventType::KeyUp, recorder(&log, "up"));

    dom.dispatch_key_event(&KeyboardEvent::key_down("a"));
    assert!(log.borrow().is_empty());

    dom.dispatch_key_event(&KeyboardEvent::key_up("a"));
    assert_eq!(*log.borrow(), vec!["up"]);
}

#[test]
fn test_blur_window_runs_window_blur_listeners() {
    let dom = Dom::new();
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    dom.add_blur_listener(Target::Window, move || sink.set(sink.get() + 1));

    dom.blur_window();
    dom.blur_window();

    assert_eq!(count.get(), 2);
}

#[test]
fn test_contains_and_reparenting() {
    let first = Element::new("div");
    let second = Element::new("div");
    let child = Element::new("p");

    first.append_child(&child);
    assert!(first.contains(&child));
    assert!(first.contains(&first));

    second.append_child(&child);
    assert!(!first.contains(&child));
    assert!(second.contains(&child));
    assert!(first.children().is_empty());
}

#[test]
fn test_input_like_elements() {
    assert!(Element::input("text").is_input_like());
    assert!(Element::new("input").is_input_like());
    assert!(Element::new("TEXTAREA").is_input_like());
    assert!(Element::new("select").is_input_like());
    assert!(!Element::input("button").is_input_like());
    assert!(!Element::input("Submit").is_input_like());
    assert!(!Element::input("reset").is_input_like());
    assert!(!Element::new("div").is_input_like());

    let editable = Element::new("div");
    editable.set_content_editable("");
    assert!(editable.is_input_like());

    let not_editable = Element::new("div");
    not_editable.set_content_editable("false");
    assert!(!not_editable.is_input_like());
}

#[test]
fn test_element_identity() {
    let a = Element::new("div");
    let b = Element::new("div");
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
    assert_ne!(Target::from(&a), Target::from(&b));
}
