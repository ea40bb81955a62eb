//! Routes touches to handlers registered per node.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase};

use crate::config::Screen;
use crate::math::Vec2;
use crate::node::Node;

/// Touch id used for the emulated mouse touch.
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

/// What happened to a touch from the point of view of one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Down,
    Move,
    Up,
    /// The touch left the node or was cancelled by the system.
    Cancel,
}

/// A touch in scene space (y up).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub id: u64,
    pub phase: TouchPhase,
    pub location: Vec2,
}

impl TouchEvent {
    pub fn new(id: u64, phase: TouchPhase, location: Vec2) -> Self {
        Self {
            id,
            phase,
            location,
        }
    }

    /// Convert a winit touch, whose origin is the window's top-left corner.
    pub fn from_winit(touch: &Touch, screen: &Screen) -> Self {
        Self::from_window(touch.id, touch.phase, touch.location, screen)
    }

    /// Build from a window position, flipping y into scene space.
    pub fn from_window(
        id: u64,
        phase: TouchPhase,
        location: PhysicalPosition<f64>,
        screen: &Screen,
    ) -> Self {
        let window = Vec2::new(location.x as f32, location.y as f32);
        Self::new(id, phase, screen.to_scene(window))
    }
}

/// Finds the current state of a registered node.
pub trait NodeLookup<K> {
    fn node(&self, key: &K) -> Option<&Node>;
}

impl<K: Eq + Hash, S: BuildHasher> NodeLookup<K> for HashMap<K, Node, S> {
    fn node(&self, key: &K) -> Option<&Node> {
        self.get(key)
    }
}

impl NodeLookup<usize> for [Node] {
    fn node(&self, key: &usize) -> Option<&Node> {
        self.get(*key)
    }
}

impl NodeLookup<usize> for Vec<Node> {
    fn node(&self, key: &usize) -> Option<&Node> {
        self.get(*key)
    }
}

pub type TouchHandler<K> = Box<dyn FnMut(&K, TouchKind, &TouchEvent)>;

struct Registration<K> {
    key: K,
    handler: TouchHandler<K>,
}

/// Delivers touch down, move, up and cancel events to registered nodes.
///
/// A touch that starts on a node is tracked for that node until it ends, is
/// cancelled, or moves off the node (which delivers [`TouchKind::Cancel`]).
/// Nodes are looked up on every event, so moving a node between events is fine.
pub struct TouchDistributor<K> {
    screen: Screen,
    registrations: Vec<Registration<K>>,
    tracked: HashMap<u64, Vec<K>>,
    touch_enabled: bool,
    mouse_location: Vec2,
    mouse_down: bool,
}

impl<K: Clone + PartialEq + std::fmt::Debug> TouchDistributor<K> {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            registrations: Vec::new(),
            tracked: HashMap::new(),
            touch_enabled: true,
            mouse_location: Vec2::ZERO,
            mouse_down: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn is_touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    /// Disabling drops every touch currently being tracked.
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.tracked.clear();
            self.mouse_down = false;
        }
        self.touch_enabled = enabled;
    }

    /// Register `handler` for touches on the node `key`, replacing any previous handler.
    pub fn register<F>(&mut self, key: K, handler: F)
    where
        F: FnMut(&K, TouchKind, &TouchEvent) + 'static,
    {
        let handler: TouchHandler<K> = Box::new(handler);
        if let Some(existing) = self.registrations.iter_mut().find(|r| r.key == key) {
            log::debug!("Replacing touch handler for {:?}", key);
            existing.handler = handler;
        } else {
            log::debug!("Registered touch handler for {:?}", key);
            self.registrations.push(Registration { key, handler });
        }
    }

    /// Returns false if `key` was not registered.
    pub fn unregister(&mut self, key: &K) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| &r.key != key);
        if self.registrations.len() == before {
            return false;
        }
        for keys in self.tracked.values_mut() {
            keys.retain(|k| k != key);
        }
        self.tracked.retain(|_, keys| !keys.is_empty());
        true
    }

    pub fn unregister_all(&mut self) {
        self.registrations.clear();
        self.tracked.clear();
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.registrations.iter().any(|r| &r.key == key)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Number of nodes currently tracking touch `id`.
    pub fn tracking(&self, id: u64) -> usize {
        self.tracked.get(&id).map_or(0, Vec::len)
    }

    /// Dispatch a touch. Returns true if at least one node handled it.
    pub fn handle_touch(&mut self, event: &TouchEvent, nodes: &(impl NodeLookup<K> + ?Sized)) -> bool {
        if !self.touch_enabled {
            return false;
        }

        match event.phase {
            TouchPhase::Started => self.touch_began(event, nodes),
            TouchPhase::Moved => self.touch_moved(event, nodes),
            TouchPhase::Ended => self.touch_ended(event, nodes),
            TouchPhase::Cancelled => self.touch_cancelled(event),
        }
    }

    /// Convert and dispatch a winit touch.
    pub fn handle_winit_touch(&mut self, touch: &Touch, nodes: &(impl NodeLookup<K> + ?Sized)) -> bool {
        self.handle_window_touch(touch.id, touch.phase, touch.location, nodes)
    }

    /// Dispatch a touch given in window coordinates.
    pub fn handle_window_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        location: PhysicalPosition<f64>,
        nodes: &(impl NodeLookup<K> + ?Sized),
    ) -> bool {
        let event = TouchEvent::from_window(id, phase, location, &self.screen);
        self.handle_touch(&event, nodes)
    }

    /// Feed cursor movement; while the left button is held it acts as a touch.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64, nodes: &(impl NodeLookup<K> + ?Sized)) -> bool {
        self.mouse_location = self.screen.to_scene(Vec2::new(x as f32, y as f32));
        if !self.mouse_down {
            return false;
        }
        let event = TouchEvent::new(MOUSE_TOUCH_ID, TouchPhase::Moved, self.mouse_location);
        self.handle_touch(&event, nodes)
    }

    /// Feed a mouse button; only the left button emulates a touch.
    pub fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        nodes: &(impl NodeLookup<K> + ?Sized),
    ) -> bool {
        if button != MouseButton::Left || !self.touch_enabled {
            return false;
        }
        let phase = match state {
            ElementState::Pressed if !self.mouse_down => TouchPhase::Started,
            ElementState::Released if self.mouse_down => TouchPhase::Ended,
            _ => return false,
        };
        self.mouse_down = state == ElementState::Pressed;
        let event = TouchEvent::new(MOUSE_TOUCH_ID, phase, self.mouse_location);
        self.handle_touch(&event, nodes)
    }

    fn touch_began(&mut self, event: &TouchEvent, nodes: &(impl NodeLookup<K> + ?Sized)) -> bool {
        let mut claimed = Vec::new();
        for registration in &mut self.registrations {
            let hit = nodes
                .node(&registration.key)
                .is_some_and(|node| node.visible && node.is_touched_by(event.location));
            if hit {
                (registration.handler)(&registration.key, TouchKind::Down, event);
                claimed.push(registration.key.clone());
            }
        }

        if claimed.is_empty() {
            return false;
        }
        log::trace!("Touch {} claimed by {} node(s)", event.id, claimed.len());
        self.tracked.insert(event.id, claimed);
        true
    }

    fn touch_moved(&mut self, event: &TouchEvent, nodes: &(impl NodeLookup<K> + ?Sized)) -> bool {
        let Some(mut keys) = self.tracked.remove(&event.id) else {
            return false;
        };

        keys.retain(|key| {
            let inside = nodes
                .node(key)
                .is_some_and(|node| node.visible && node.is_touched_by(event.location));
            let kind = if inside {
                TouchKind::Move
            } else {
                TouchKind::Cancel
            };
            dispatch(&mut self.registrations, key, kind, event);
            inside
        });

        if !keys.is_empty() {
            self.tracked.insert(event.id, keys);
        }
        true
    }

    fn touch_ended(&mut self, event: &TouchEvent, nodes: &(impl NodeLookup<K> + ?Sized)) -> bool {
        let Some(keys) = self.tracked.remove(&event.id) else {
            return false;
        };

        for key in &keys {
            let inside = nodes
                .node(key)
                .is_some_and(|node| node.visible && node.is_touched_by(event.location));
            let kind = if inside {
                TouchKind::Up
            } else {
                TouchKind::Cancel
            };
            dispatch(&mut self.registrations, key, kind, event);
        }
        true
    }

    fn touch_cancelled(&mut self, event: &TouchEvent) -> bool {
        let Some(keys) = self.tracked.remove(&event.id) else {
            return false;
        };

        for key in &keys {
            dispatch(&mut self.registrations, key, TouchKind::Cancel, event);
        }
        true
    }
}

fn dispatch<K: PartialEq>(
    registrations: &mut [Registration<K>],
    key: &K,
    kind: TouchKind,
    event: &TouchEvent,
) {
    if let Some(registration) = registrations.iter_mut().find(|r| &r.key == key) {
        (registration.handler)(&registration.key, kind, event);
    }
}
