//! Configuration for the reorder coordinator.

/// What happens when the handle of the column being dragged is removed from
/// the grid mid-gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleRemovalPolicy {
    /// Drop the gesture: clear the snapshot and hovered target, reset the
    /// dragged element's offset, emit nothing.
    #[default]
    AbortGesture,
    /// Keep the frozen snapshot. The removed handle delivers no further
    /// events, so the gesture only ends at the next drag-start or a direct
    /// `on_drag_end` call from the host.
    KeepSnapshot,
}

/// Reorder coordinator settings.
#[derive(Debug, Clone, Default)]
pub struct ReorderConfig {
    /// Policy for removal of the dragged handle during a gesture.
    pub handle_removal: HandleRemovalPolicy,
}

impl ReorderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mid-drag removal policy.
    pub fn handle_removal(mut self, policy: HandleRemovalPolicy) -> Self {
        self.handle_removal = policy;
        self
    }
}
