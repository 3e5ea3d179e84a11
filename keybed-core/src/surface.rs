//! Keyboard surface: the piano container
//!
//! Owns the key table, the sampler slot and the horizontal scroll state, and
//! routes input to individual keys. Physical key events are routed through a
//! `ListenerRegistry` so that only keys with a live registration see them; the
//! wheel remap is likewise active only while its registration is held.
//!
//! Rendering lives in the GUI crate. Everything here can be driven from tests
//! with a mock sampler backend.

use crate::engine::{EngineSlot, EngineStatus, SamplerBackend};
use crate::input::{EventResponse, KeyInput, WheelDelta};
use crate::key_table::{build_key_table, KEY_OCTAVES};
use crate::listener::{ListenerGuard, ListenerRegistry};
use crate::playable_key::{KeyListeners, PlayableKey};
use crate::scroll::HorizontalScroll;

/// Topic of the keyboard's horizontal scroll container
pub const KEYBOARD_SCROLL: &str = "keyboard-scroll";

/// Wheel listeners: topic is the scroll container
pub type WheelListeners = ListenerRegistry<&'static str, ()>;

pub struct KeyboardSurface<B> {
    keys: Vec<PlayableKey>,
    engine: EngineSlot<B>,
    scroll: HorizontalScroll,
    key_listeners: KeyListeners,
    wheel_listeners: WheelListeners,
    wheel_listener: Option<ListenerGuard>,
    mounted: bool,
}

impl<B: SamplerBackend> Default for KeyboardSurface<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SamplerBackend> KeyboardSurface<B> {
    /// Surface with its own listener registries
    pub fn new() -> Self {
        Self::with_listeners(KeyListeners::new(), WheelListeners::new())
    }

    /// Surface registering into registries owned by the caller (the window)
    pub fn with_listeners(key_listeners: KeyListeners, wheel_listeners: WheelListeners) -> Self {
        Self {
            keys: Vec::new(),
            engine: EngineSlot::new(),
            scroll: HorizontalScroll::default(),
            key_listeners,
            wheel_listeners,
            wheel_listener: None,
            mounted: false,
        }
    }

    /// Build the key table, attach listeners and enter the loading state
    ///
    /// The caller starts the actual sample load and later reports it through
    /// `install_engine` or `fail_loading`.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }

        self.keys = build_key_table(KEY_OCTAVES)
            .into_iter()
            .map(PlayableKey::new)
            .collect();
        for (index, key) in self.keys.iter_mut().enumerate() {
            key.attach(&self.key_listeners, index);
        }
        self.wheel_listener = Some(self.wheel_listeners.register(KEYBOARD_SCROLL, ()));
        self.engine.begin_loading();
        self.mounted = true;

        log::info!(
            "Keyboard surface mounted with {} keys ({} bound)",
            self.keys.len(),
            self.keys.iter().filter(|k| k.is_listening()).count()
        );
    }

    /// Release every listener and drop the rendered keys
    ///
    /// The sampler stays installed; it is replaced (and disposed) on the next
    /// `install_engine`, or freed when the surface itself is dropped.
    pub fn unmount(&mut self) {
        for key in &mut self.keys {
            key.detach();
        }
        self.keys.clear();
        self.wheel_listener = None;
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn keys(&self) -> &[PlayableKey] {
        &self.keys
    }

    /// Index of the key with the given id
    pub fn key_index(&self, key_id: &str) -> Option<usize> {
        self.keys.iter().position(|key| key.id() == key_id)
    }

    pub fn key_listeners(&self) -> &KeyListeners {
        &self.key_listeners
    }

    pub fn wheel_listeners(&self) -> &WheelListeners {
        &self.wheel_listeners
    }

    // Engine lifecycle

    pub fn status(&self) -> &EngineStatus {
        self.engine.status()
    }

    /// True until a sampler has been installed or loading failed
    pub fn is_loading(&self) -> bool {
        matches!(
            self.engine.status(),
            EngineStatus::Loading | EngineStatus::Uninitialized
        )
    }

    /// Mark a (re)load as started
    pub fn begin_loading(&mut self) {
        self.engine.begin_loading();
    }

    /// Install a loaded sampler, disposing any previous one
    pub fn install_engine(&mut self, backend: B) {
        self.engine.install(backend);
    }

    pub fn fail_loading(&mut self, reason: impl Into<String>) {
        self.engine.fail(reason);
    }

    pub fn engine(&self) -> &EngineSlot<B> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineSlot<B> {
        &mut self.engine
    }

    // Physical keyboard

    /// Route a key-down to the keys listening for it; returns true if any did
    pub fn dispatch_key_down(&mut self, input: &KeyInput) -> bool {
        let mut handled = false;
        for index in self.key_listeners.owners_for(&input.key) {
            if let Some(key) = self.keys.get_mut(index) {
                handled |= key.key_down(input, &mut self.engine);
            }
        }
        handled
    }

    /// Route a key-up to the keys listening for it; returns true if any did
    pub fn dispatch_key_up(&mut self, input: &KeyInput) -> bool {
        let mut handled = false;
        for index in self.key_listeners.owners_for(&input.key) {
            if let Some(key) = self.keys.get_mut(index) {
                handled |= key.key_up(input, &mut self.engine);
            }
        }
        handled
    }

    /// Change the physical key bound to a key
    ///
    /// A physical key drives at most one key: a binding already held by
    /// another key moves over and the other key ends up unbound. Keys whose
    /// binding changes are released first, since their key-up would no
    /// longer reach them.
    pub fn rebind(&mut self, index: usize, binding: Option<&'static str>) {
        if index >= self.keys.len() {
            return;
        }

        if let Some(physical) = binding {
            for (other, key) in self.keys.iter_mut().enumerate() {
                if other != index && key.binding() == Some(physical) {
                    log::debug!("Moving binding {:?} from {} to key {}", physical, key.id(), index);
                    key.force_release(&mut self.engine);
                    key.set_binding(None, &self.key_listeners, other);
                }
            }
        }

        let key = &mut self.keys[index];
        if key.binding() != binding {
            key.force_release(&mut self.engine);
        }
        key.set_binding(binding, &self.key_listeners, index);
    }

    // Pointer and touch

    pub fn pointer_down(&mut self, index: usize) {
        if let Some(key) = self.keys.get_mut(index) {
            key.pointer_down(&mut self.engine);
        }
    }

    pub fn pointer_up(&mut self, index: usize) {
        if let Some(key) = self.keys.get_mut(index) {
            key.pointer_up(&mut self.engine);
        }
    }

    pub fn pointer_leave(&mut self, index: usize) {
        if let Some(key) = self.keys.get_mut(index) {
            key.pointer_leave(&mut self.engine);
        }
    }

    pub fn touch_start(&mut self, index: usize) -> EventResponse {
        match self.keys.get_mut(index) {
            Some(key) => key.touch_start(&mut self.engine),
            None => EventResponse::IGNORED,
        }
    }

    pub fn touch_end(&mut self, index: usize) {
        if let Some(key) = self.keys.get_mut(index) {
            key.touch_end(&mut self.engine);
        }
    }

    /// Release every pressed key (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        for key in &mut self.keys {
            key.force_release(&mut self.engine);
        }
    }

    // Scrolling

    pub fn scroll(&self) -> &HorizontalScroll {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut HorizontalScroll {
        &mut self.scroll
    }

    /// Jump the scroll container to an absolute offset
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll.set_offset(offset);
    }

    /// Wheel over the scroll container; remapped only while the wheel
    /// listener is attached
    pub fn handle_wheel(&mut self, wheel: WheelDelta) -> EventResponse {
        if self.wheel_listener.is_none() || !self.wheel_listeners.has_listeners(&KEYBOARD_SCROLL) {
            return EventResponse::IGNORED;
        }
        self.scroll.apply_wheel(wheel)
    }
}
