use std::fmt;

/// Lifecycle of a dialog overlay.
///
/// `Created -> Attached -> Resumed <-> Paused -> Detached`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Created,
    Attached,
    Resumed,
    Paused,
    Detached,
}

impl DialogState {
    /// Whether a dismissal can be carried out right now
    pub fn is_operation_ready(&self) -> bool {
        matches!(self, DialogState::Attached | DialogState::Resumed)
    }

    /// Whether `next` is a legal transition from this state
    pub fn can_move_to(&self, next: DialogState) -> bool {
        use DialogState::*;
        matches!(
            (self, next),
            (Created, Attached)
                | (Attached, Resumed)
                | (Resumed, Paused)
                | (Paused, Resumed)
                | (Attached, Detached)
                | (Resumed, Detached)
                | (Paused, Detached)
        )
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialogState::Created => "created",
            DialogState::Attached => "attached",
            DialogState::Resumed => "resumed",
            DialogState::Paused => "paused",
            DialogState::Detached => "detached",
        };
        write!(f, "{}", name)
    }
}
