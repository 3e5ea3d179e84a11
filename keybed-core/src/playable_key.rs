//! Press state of a single piano key
//!
//! A key is Released or Pressed. Pointer, touch and bound physical keys move
//! it between the two, and only real transitions reach the sampler: entering
//! Pressed triggers one attack, leaving it triggers one release.

use crate::engine::{EngineSlot, SamplerBackend};
use crate::input::{EventResponse, KeyInput};
use crate::key_table::Key;
use crate::listener::{ListenerGuard, ListenerRegistry};

/// Physical key listeners: topic is the physical key, owner the key index
pub type KeyListeners = ListenerRegistry<String, usize>;

/// One interactive key of the keyboard surface
#[derive(Debug)]
pub struct PlayableKey {
    key: Key,
    id: String,
    pressed: bool,
    /// Registration for the bound physical key, present while attached
    listener: Option<ListenerGuard>,
}

impl PlayableKey {
    pub fn new(key: Key) -> Self {
        let id = key.id();
        Self {
            key,
            id,
            pressed: false,
            listener: None,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Key id used for sampler triggers, e.g. "C#4"
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_black(&self) -> bool {
        self.key.is_black
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn binding(&self) -> Option<&'static str> {
        self.key.key_binding
    }

    /// Whether a physical key listener is currently registered
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Text painted on the key: the key id, plus the physical key when bound
    pub fn label(&self) -> String {
        match self.key.key_binding {
            Some(binding) => format!("{} ({})", self.id, binding.to_uppercase()),
            None => self.id.clone(),
        }
    }

    /// Start listening for the bound physical key
    ///
    /// Any previous registration is released first. Keys without a binding
    /// end up with no registration.
    pub fn attach(&mut self, listeners: &KeyListeners, index: usize) {
        self.listener = None;
        self.listener = self
            .key
            .key_binding
            .map(|binding| listeners.register(binding.to_string(), index));
    }

    /// Stop listening for physical keys
    pub fn detach(&mut self) {
        self.listener = None;
    }

    /// Change the bound physical key and re-register
    pub fn set_binding(
        &mut self,
        binding: Option<&'static str>,
        listeners: &KeyListeners,
        index: usize,
    ) {
        self.key.key_binding = binding;
        self.attach(listeners, index);
    }

    fn press<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        if !self.pressed {
            self.pressed = true;
            engine.attack(&self.id);
        }
    }

    fn unpress<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        if self.pressed {
            self.pressed = false;
            engine.release(&self.id);
        }
    }

    pub fn pointer_down<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        self.press(engine);
    }

    pub fn pointer_up<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        self.unpress(engine);
    }

    /// Pointer left the key; releases only a pressed key
    pub fn pointer_leave<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        self.unpress(engine);
    }

    /// Touch start presses the key and asks the platform to drop the
    /// mouse events it would otherwise synthesize from the touch
    pub fn touch_start<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) -> EventResponse {
        self.press(engine);
        EventResponse::PREVENT_DEFAULT
    }

    pub fn touch_end<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        self.unpress(engine);
    }

    /// Physical key down; returns true if the event was for this key
    pub fn key_down<B: SamplerBackend>(
        &mut self,
        input: &KeyInput,
        engine: &mut EngineSlot<B>,
    ) -> bool {
        if input.repeat || self.key.key_binding != Some(input.key.as_str()) {
            return false;
        }
        self.press(engine);
        true
    }

    /// Physical key up; returns true if the event was for this key
    pub fn key_up<B: SamplerBackend>(
        &mut self,
        input: &KeyInput,
        engine: &mut EngineSlot<B>,
    ) -> bool {
        if self.key.key_binding != Some(input.key.as_str()) {
            return false;
        }
        self.unpress(engine);
        true
    }

    /// Release regardless of how the key was pressed
    pub fn force_release<B: SamplerBackend>(&mut self, engine: &mut EngineSlot<B>) {
        self.unpress(engine);
    }
}
