/// Readiness flags of a host, driven by its lifecycle signals.
///
/// Navigation on a host is only allowed while it is in the foreground and its
/// container is prepared (not mid save/restore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostLifecycle {
    foreground: bool,
    container_prepared: bool,
}

impl HostLifecycle {
    /// Lifecycle of a host that is already attached and resumed
    pub fn ready() -> Self {
        Self {
            foreground: true,
            container_prepared: true,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.foreground && self.container_prepared
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    pub fn on_create(&mut self) {
        self.foreground = true;
        self.container_prepared = true;
    }

    pub fn on_resume(&mut self) {
        self.foreground = true;
    }

    /// Container may commit again once resume has fully completed
    pub fn on_post_resume(&mut self) {
        self.container_prepared = true;
    }

    pub fn on_pause(&mut self) {
        self.foreground = false;
        self.container_prepared = false;
    }

    pub fn on_save_state(&mut self) {
        self.container_prepared = false;
    }

    pub fn on_restore_state(&mut self) {
        self.container_prepared = true;
    }

    pub fn on_destroy(&mut self) {
        self.foreground = false;
        self.container_prepared = false;
    }
}
