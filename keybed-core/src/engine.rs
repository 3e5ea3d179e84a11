//! Audio engine ownership
//!
//! The keyboard surface owns exactly one `EngineSlot`. The slot holds the
//! current sampler backend (if any), replaces it with dispose-then-install
//! semantics, and turns triggers issued before a backend is ready into no-ops.

/// Sampler operations the keyboard needs
///
/// Note ids are key table ids such as "C#4".
pub trait SamplerBackend {
    /// Start playing `note_id`
    fn trigger_attack(&mut self, note_id: &str);

    /// Fade out every voice playing `note_id`
    fn trigger_release(&mut self, note_id: &str);

    /// Release audio resources; the backend is not used afterwards
    fn dispose(&mut self);
}

/// Loading lifecycle of the engine slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// No backend requested yet
    Uninitialized,
    /// Samples are being fetched and decoded
    Loading,
    /// A backend is installed and accepts triggers
    Ready,
    /// Loading failed; the reason is shown to the user
    Failed(String),
}

/// Owner of the single sampler backend
pub struct EngineSlot<B> {
    backend: Option<B>,
    status: EngineStatus,
}

impl<B> Default for EngineSlot<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> EngineSlot<B> {
    pub fn new() -> Self {
        Self {
            backend: None,
            status: EngineStatus::Uninitialized,
        }
    }

    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    /// Whether attack/release currently reach a backend
    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }
}

impl<B: SamplerBackend> EngineSlot<B> {
    /// Mark a load as in flight
    ///
    /// An already installed backend stays usable until its replacement is
    /// installed.
    pub fn begin_loading(&mut self) {
        log::debug!("Engine slot: loading");
        self.status = EngineStatus::Loading;
    }

    /// Install a freshly loaded backend, disposing the previous one first
    pub fn install(&mut self, backend: B) {
        if let Some(mut previous) = self.backend.take() {
            log::info!("Disposing previous sampler before installing a new one");
            previous.dispose();
        }
        self.backend = Some(backend);
        self.status = EngineStatus::Ready;
    }

    /// Record a failed load
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("Sampler failed to load: {}", reason);
        self.status = EngineStatus::Failed(reason);
    }

    /// Dispose and drop the installed backend
    pub fn dispose(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.dispose();
        }
        self.status = EngineStatus::Uninitialized;
    }

    /// Forward an attack; no-op until a backend is installed
    pub fn attack(&mut self, note_id: &str) {
        match self.backend.as_mut() {
            Some(backend) => backend.trigger_attack(note_id),
            None => log::trace!("Ignoring attack for {} (sampler not ready)", note_id),
        }
    }

    /// Forward a release; no-op until a backend is installed
    pub fn release(&mut self, note_id: &str) {
        match self.backend.as_mut() {
            Some(backend) => backend.trigger_release(note_id),
            None => log::trace!("Ignoring release for {} (sampler not ready)", note_id),
        }
    }
}
