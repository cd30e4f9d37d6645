use crate::host::{HostHandle, SlotId};

/// Parameters of a show request.
///
/// ```rust
/// use stacknav::ShowOptions;
///
/// let options = ShowOptions::new().with_skip_on_pop();
/// assert!(options.skip_on_pop);
/// assert!(!options.clear_stack);
/// ```
#[derive(Clone, Default)]
pub struct ShowOptions {
    /// Pop the target host's whole stack first
    pub clear_stack: bool,

    /// Back presses landing on this node continue to its own back-link
    pub skip_on_pop: bool,

    /// Explicit target. Bypasses tab routing.
    pub target: Option<HostHandle>,

    /// Slot inside the target, defaults to the host's default slot
    pub slot: Option<SlotId>,
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clear_stack(mut self) -> Self {
        self.clear_stack = true;
        self
    }

    pub fn with_skip_on_pop(mut self) -> Self {
        self.skip_on_pop = true;
        self
    }

    pub fn in_host(mut self, host: HostHandle) -> Self {
        self.target = Some(host);
        self
    }

    pub fn in_slot(mut self, slot: SlotId) -> Self {
        self.slot = Some(slot);
        self
    }
}
