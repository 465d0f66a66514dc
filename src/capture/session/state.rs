//! Pure state machine for the capture button.
//!
//! `(SessionState, SessionEvent) -> (SessionState, Vec<SideEffect>)`
//!
//! The machine never touches the stream or the filesystem; the
//! [`CaptureService`](super::CaptureService) executes the returned effects.
//!
//! Timing rule: pressing the button opens a stream. A second signal (the
//! release) while the stream is open commits it to a bitmap. If no signal
//! arrives within [`HOLD_CANCEL_THRESHOLD`] of opening, the stream is discarded.

use crate::capture::types::{Tick, HOLD_CANCEL_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No stream open.
    #[default]
    Idle,

    /// A stream is open and waiting for the release.
    Capturing { started_at: Tick },

    /// The bitmap is being written from the open stream.
    Committing { started_at: Tick },
}

impl SessionState {
    /// Tick at which the current stream was opened, if any.
    pub fn start_tick(&self) -> Option<Tick> {
        match self {
            SessionState::Capturing { started_at } | SessionState::Committing { started_at } => {
                Some(*started_at)
            }
            SessionState::Idle => None,
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, SessionState::Capturing { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The capture button signalled.
    ButtonFired,

    /// The wait for the button expired at `now`.
    WaitTimedOut { now: Tick },

    /// The frame stream opened at `at`.
    StreamOpened { at: Tick },

    /// The frame stream could not be opened.
    StreamUnavailable,

    /// The bitmap was written.
    CommitFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Ask the frame source for a stream.
    OpenStream,

    /// Run the capture pipeline against the open stream.
    CommitCapture,

    /// Release the open stream.
    CloseStream,
}

pub fn transition(state: SessionState, event: SessionEvent) -> (SessionState, Vec<SideEffect>) {
    match (state, event) {
        // Idle + ButtonFired -> Idle, stream requested
        (SessionState::Idle, SessionEvent::ButtonFired) => (state, vec![SideEffect::OpenStream]),

        (SessionState::Idle, SessionEvent::StreamOpened { at }) => {
            (SessionState::Capturing { started_at: at }, vec![])
        }

        // No stream, no session
        (SessionState::Idle, SessionEvent::StreamUnavailable) => (SessionState::Idle, vec![]),

        // Capturing + ButtonFired -> Committing
        (SessionState::Capturing { started_at }, SessionEvent::ButtonFired) => (
            SessionState::Committing { started_at },
            vec![SideEffect::CommitCapture],
        ),

        // Held too long without a release: discard
        (SessionState::Capturing { started_at }, SessionEvent::WaitTimedOut { now })
            if now.since(started_at) > HOLD_CANCEL_THRESHOLD =>
        {
            (SessionState::Idle, vec![SideEffect::CloseStream])
        }

        (SessionState::Committing { .. }, SessionEvent::CommitFinished) => {
            (SessionState::Idle, vec![SideEffect::CloseStream])
        }

        // Any other signal resets to Idle, releasing whatever is still open
        (SessionState::Committing { .. }, SessionEvent::ButtonFired) => {
            (SessionState::Idle, vec![SideEffect::CloseStream])
        }

        // Everything else leaves the state alone
        _ => (state, vec![]),
    }
}
