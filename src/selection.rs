use log::debug;

use crate::markers::MarkerEntity;

/// Which marker's info card is visible. At most one marker is ever selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(MarkerEntity),
}

/// Result of a marker tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// First selection from idle.
    Selected,
    /// A different (or the same) marker replaced the current one. The state
    /// passed through `Idle` internally so the card exit and entrance
    /// animations replay deterministically; callers see one transition.
    Reselected,
    /// A previous transition has not settled yet; the tap was dropped.
    Dropped,
}

/// Result of a close or background tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    AlreadyIdle,
    Dropped,
}

/// Single-selection state machine for the marker info card.
///
/// Transitions are serialized by a settle acknowledgement: after every
/// accepted transition the controller rejects further taps and dismissals
/// until [`SelectionController::settled`] is called (the renderer calls it
/// when the card animation finishes). Rejected requests are dropped, never
/// queued.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    settling: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&MarkerEntity> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selected(marker) => Some(marker),
        }
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    pub fn tap(&mut self, marker: MarkerEntity) -> TapOutcome {
        if self.settling {
            debug!("selection busy, dropping tap on {}", marker.id());
            return TapOutcome::Dropped;
        }

        let reselect = matches!(self.state, SelectionState::Selected(_));
        if reselect {
            // Pass through Idle before the new selection.
            self.state = SelectionState::Idle;
        }

        debug!("marker {} selected", marker.id());
        self.state = SelectionState::Selected(marker);
        self.settling = true;

        if reselect {
            TapOutcome::Reselected
        } else {
            TapOutcome::Selected
        }
    }

    pub fn close(&mut self) -> CloseOutcome {
        if self.settling {
            debug!("selection busy, dropping close");
            return CloseOutcome::Dropped;
        }

        match self.state {
            SelectionState::Idle => CloseOutcome::AlreadyIdle,
            SelectionState::Selected(_) => {
                debug!("selection closed");
                self.state = SelectionState::Idle;
                self.settling = true;
                CloseOutcome::Closed
            }
        }
    }

    /// Acknowledge that the card animation for the last transition finished.
    pub fn settled(&mut self) {
        self.settling = false;
    }
}
