use crate::domain::wagers::ContractId;

/// Outbound notifications produced by the engine for external collaborators
/// (UI chrome, audio, analytics). The engine never calls back into the host;
/// it buffers events here and the caller drains them at its own cadence.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    SquareSelected { square_id: ContractId },
    SelectionChanged,
    CameraFollowingChanged { is_following: bool },
    ZoomLevelChanged { zoom_level: f64 },
    Resized { width: f64, height: f64 },
    SelectionSoundRequested,
}

impl CoreEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CoreEvent::SquareSelected { .. } => "SquareSelected",
            CoreEvent::SelectionChanged => "SelectionChanged",
            CoreEvent::CameraFollowingChanged { .. } => "CameraFollowingChanged",
            CoreEvent::ZoomLevelChanged { .. } => "ZoomLevelChanged",
            CoreEvent::Resized { .. } => "Resized",
            CoreEvent::SelectionSoundRequested => "SelectionSoundRequested",
        }
    }
}

/// FIFO buffer of pending [`CoreEvent`]s.
///
/// Callers choose their own dispatch mechanism: drain once per frame, per
/// input event, or whenever convenient. Draining returns events in emission
/// order and leaves the queue empty.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<CoreEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count of buffered events of the same variant as `kind`.
    pub fn count_of(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.event_type() == kind).count()
    }
}
