//! In-process event host: targets, elements, keyboard events and listener
//! dispatch with capture and bubbling.
//!
//! The engine never talks to a real browser. A host (webview bridge, TUI,
//! test) owns a [`Dom`], feeds it [`KeyboardEvent`]s and window blur
//! notifications, and the dispatch rules below decide which listeners see
//! them:
//!
//! - capture listeners run first, from `Window` to `Document` and then down
//!   the ancestors to the originating element
//! - bubble listeners then run from the originating element up through each
//!   ancestor to `Document` and `Window`
//! - every listener attached to a visited node runs, in attach order
//! - `stop_propagation` stops the walk after the current node, in either
//!   phase
//!
//! Listener lists are copied per node before any listener runs, so listeners
//! may attach or detach freely while an event is in flight.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Instant;

/// Keyboard event phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventType {
    #[default]
    KeyDown,
    KeyUp,
}

impl KeyEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for KeyEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every event kind a listener can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    Blur,
}

impl From<KeyEventType> for EventType {
    fn from(kind: KeyEventType) -> Self {
        match kind {
            KeyEventType::KeyDown => Self::KeyDown,
            KeyEventType::KeyUp => Self::KeyUp,
        }
    }
}

// =============================================================================
// ELEMENTS
// =============================================================================

struct ElementNode {
    tag: String,
    input_type: RefCell<Option<String>>,
    content_editable: RefCell<Option<String>>,
    parent: RefCell<Weak<ElementNode>>,
    children: RefCell<Vec<Element>>,
}

/// A node in the element tree. Clones share identity.
#[derive(Clone)]
pub struct Element(Rc<ElementNode>);

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(ElementNode {
            tag: tag.into().to_lowercase(),
            input_type: RefCell::new(None),
            content_editable: RefCell::new(None),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        }))
    }

    /// `<input type="...">`.
    pub fn input(input_type: &str) -> Self {
        let element = Self::new("input");
        element.set_input_type(input_type);
        element
    }

    pub fn tag_name(&self) -> &str {
        &self.0.tag
    }

    pub fn set_input_type(&self, input_type: &str) {
        *self.0.input_type.borrow_mut() = Some(input_type.to_string());
    }

    pub fn set_content_editable(&self, value: &str) {
        *self.0.content_editable.borrow_mut() = Some(value.to_string());
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.parent.borrow().upgrade().map(Element)
    }

    /// Attach `child` under this element, detaching it from any old parent.
    pub fn append_child(&self, child: &Element) {
        if let Some(old_parent) = child.parent() {
            old_parent
                .0
                .children
                .borrow_mut()
                .retain(|existing| existing != child);
        }
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.children.borrow().clone()
    }

    /// True if `other` is this element or one of its descendants.
    pub fn contains(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if &node == self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Text-entry elements: text-like inputs, textarea, select, and
    /// contenteditable. Button-type inputs are excluded.
    pub fn is_input_like(&self) -> bool {
        match self.tag_name() {
            "input" => {
                let input_type = self.0.input_type.borrow();
                let input_type = input_type.as_deref().unwrap_or("text").to_lowercase();
                !matches!(input_type.as_str(), "button" | "submit" | "reset")
            }
            "textarea" | "select" => true,
            _ => matches!(
                self.0.content_editable.borrow().as_deref(),
                Some("true") | Some("")
            ),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0.tag)
    }
}

/// Where listeners attach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Document,
    Window,
    Element(Element),
}

impl Target {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Target::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Target {
    fn from(element: Element) -> Self {
        Target::Element(element)
    }
}

impl From<&Element> for Target {
    fn from(element: &Element) -> Self {
        Target::Element(element.clone())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Document => f.write_str("document"),
            Target::Window => f.write_str("window"),
            Target::Element(element) => write!(f, "{element:?}"),
        }
    }
}

// =============================================================================
// KEYBOARD EVENTS
// =============================================================================

/// A keyboard event. Dispatch state lives in cells so listeners can flag it
/// through a shared reference.
#[derive(Debug)]
pub struct KeyboardEvent {
    event_type: KeyEventType,
    key: String,
    code: Option<String>,
    ctrl_key: bool,
    shift_key: bool,
    alt_key: bool,
    meta_key: bool,
    target: Option<Element>,
    time_stamp: Instant,
    current_target: RefCell<Option<Target>>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl KeyboardEvent {
    pub fn new(event_type: KeyEventType, key: impl Into<String>) -> Self {
        Self {
            event_type,
            key: key.into(),
            code: None,
            ctrl_key: false,
            shift_key: false,
            alt_key: false,
            meta_key: false,
            target: None,
            time_stamp: Instant::now(),
            current_target: RefCell::new(None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self::new(KeyEventType::KeyDown, key)
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        Self::new(KeyEventType::KeyUp, key)
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn ctrl(mut self, held: bool) -> Self {
        self.ctrl_key = held;
        self
    }

    pub fn shift(mut self, held: bool) -> Self {
        self.shift_key = held;
        self
    }

    pub fn alt(mut self, held: bool) -> Self {
        self.alt_key = held;
        self
    }

    pub fn meta(mut self, held: bool) -> Self {
        self.meta_key = held;
        self
    }

    /// Originating element. Events without one start at the document.
    pub fn on(mut self, target: &Element) -> Self {
        self.target = Some(target.clone());
        self
    }

    pub fn at(mut self, time_stamp: Instant) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    pub fn event_type(&self) -> KeyEventType {
        self.event_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn ctrl_key(&self) -> bool {
        self.ctrl_key
    }

    pub fn shift_key(&self) -> bool {
        self.shift_key
    }

    pub fn alt_key(&self) -> bool {
        self.alt_key
    }

    pub fn meta_key(&self) -> bool {
        self.meta_key
    }

    pub fn target(&self) -> Option<&Element> {
        self.target.as_ref()
    }

    pub fn time_stamp(&self) -> Instant {
        self.time_stamp
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> Option<Target> {
        self.current_target.borrow().clone()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    fn set_current_target(&self, target: Option<Target>) {
        *self.current_target.borrow_mut() = target;
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Which walk a listener joins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ListenerPhase {
    /// Outermost node first, before any bubble listener.
    Capture,
    #[default]
    Bubble,
}

type KeyListener = Rc<dyn Fn(&KeyboardEvent)>;
type BlurListener = Rc<dyn Fn()>;

#[derive(Clone)]
enum Listener {
    Key(KeyListener),
    Blur(BlurListener),
}

struct ListenerEntry {
    id: ListenerId,
    target: Target,
    kind: EventType,
    phase: ListenerPhase,
    listener: Listener,
}

#[derive(Default)]
struct DomInner {
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener_id: Cell<u64>,
}

/// Listener registry and dispatcher. Clones share state.
#[derive(Clone, Default)]
pub struct Dom {
    inner: Rc<DomInner>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key_listener(
        &self,
        target: Target,
        kind: KeyEventType,
        listener: impl Fn(&KeyboardEvent) + 'static,
    ) -> ListenerId {
        self.push(
            target,
            kind.into(),
            ListenerPhase::Bubble,
            Listener::Key(Rc::new(listener)),
        )
    }

    /// Listener that sees the event before any bubble listener on the path.
    pub fn add_capture_key_listener(
        &self,
        target: Target,
        kind: KeyEventType,
        listener: impl Fn(&KeyboardEvent) + 'static,
    ) -> ListenerId {
        self.push(
            target,
            kind.into(),
            ListenerPhase::Capture,
            Listener::Key(Rc::new(listener)),
        )
    }

    /// Blur listeners only fire for `Target::Window`.
    pub fn add_blur_listener(&self, target: Target, listener: impl Fn() + 'static) -> ListenerId {
        self.push(
            target,
            EventType::Blur,
            ListenerPhase::Bubble,
            Listener::Blur(Rc::new(listener)),
        )
    }

    fn push(
        &self,
        target: Target,
        kind: EventType,
        phase: ListenerPhase,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.inner.next_listener_id.get() + 1);
        self.inner.next_listener_id.set(id.0);
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            target,
            kind,
            phase,
            listener,
        });
        id
    }

    /// Detach a listener. Unknown ids are ignored.
    pub fn remove_listener(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|entry| entry.id != id);
    }

    pub fn listener_count(&self, target: &Target, kind: EventType) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|entry| &entry.target == target && entry.kind == kind)
            .count()
    }

    pub fn total_listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn is_attached(&self, id: ListenerId) -> bool {
        self.inner
            .listeners
            .borrow()
            .iter()
            .any(|entry| entry.id == id)
    }

    fn snapshot(
        &self,
        target: &Target,
        kind: EventType,
        phase: ListenerPhase,
    ) -> Vec<(ListenerId, Listener)> {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|entry| &entry.target == target && entry.kind == kind && entry.phase == phase)
            .map(|entry| (entry.id, entry.listener.clone()))
            .collect()
    }

    /// Dispatch a keyboard event through the capture walk, then the bubble
    /// walk.
    pub fn dispatch_key_event(&self, event: &KeyboardEvent) {
        let kind = EventType::from(event.event_type());

        let mut path: Vec<Target> = Vec::new();
        let mut node = event.target().cloned();
        while let Some(element) = node {
            node = element.parent();
            path.push(Target::Element(element));
        }
        path.push(Target::Document);
        path.push(Target::Window);

        let walk = path
            .iter()
            .rev()
            .map(|target| (target, ListenerPhase::Capture))
            .chain(path.iter().map(|target| (target, ListenerPhase::Bubble)));
        for (target, phase) in walk {
            if self.run_node(event, target, kind, phase) {
                break;
            }
        }

        event.set_current_target(None);
    }

    /// Run one node's listeners. Returns true once propagation is stopped.
    fn run_node(
        &self,
        event: &KeyboardEvent,
        target: &Target,
        kind: EventType,
        phase: ListenerPhase,
    ) -> bool {
        let listeners = self.snapshot(target, kind, phase);
        if listeners.is_empty() {
            return false;
        }

        event.set_current_target(Some(target.clone()));
        for (id, listener) in listeners {
            if !self.is_attached(id) {
                continue;
            }
            if let Listener::Key(callback) = listener {
                callback(event);
            }
        }

        event.propagation_stopped()
    }

    /// Window lost focus.
    pub fn blur_window(&self) {
        for (id, listener) in self.snapshot(&Target::Window, EventType::Blur, ListenerPhase::Bubble) {
            if !self.is_attached(id) {
                continue;
            }
            if let Listener::Blur(callback) = listener {
                callback();
            }
        }
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("listeners", &self.total_listener_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
