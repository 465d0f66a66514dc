//! CaptureService - single owner of the capture session.
//!
//! Owns the frame source, storage, clock, the open stream (if any) and the
//! scratch buffers. Button outcomes are turned into [`SessionEvent`]s, run
//! through [`transition`], and the resulting [`SideEffect`]s executed inline
//! on the calling thread.

use std::path::PathBuf;
use std::time::Duration;

use super::commit::commit_capture;
use super::state::{transition, SessionEvent, SessionState, SideEffect};
use crate::capture::button::{ButtonSource, WaitOutcome};
use crate::capture::clock::Clock;
use crate::capture::errors::CaptureError;
use crate::capture::storage::CaptureFs;
use crate::capture::stream::{FrameSource, FrameStreamSession};
use crate::capture::types::{ChunkBuffers, FrameGeometry, BUTTON_WAIT, STREAM_OPEN_TIMEOUT};

pub struct CaptureService<S: FrameSource, F: CaptureFs, C: Clock> {
    source: S,
    fs: F,
    clock: C,
    geometry: FrameGeometry,
    state: SessionState,
    stream: Option<FrameStreamSession<S::Stream>>,
    buffers: ChunkBuffers,
    wait: Duration,
    last_capture: Option<PathBuf>,
}

impl<S: FrameSource, F: CaptureFs, C: Clock> CaptureService<S, F, C> {
    pub fn new(source: S, fs: F, clock: C) -> Self {
        Self::with_geometry(source, fs, clock, FrameGeometry::HANDHELD)
    }

    pub fn with_geometry(source: S, fs: F, clock: C, geometry: FrameGeometry) -> Self {
        Self {
            source,
            fs,
            clock,
            geometry,
            state: SessionState::Idle,
            stream: None,
            buffers: ChunkBuffers::new(&geometry),
            wait: BUTTON_WAIT,
            last_capture: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn has_open_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Path of the most recent committed capture.
    pub fn last_capture(&self) -> Option<&PathBuf> {
        self.last_capture.as_ref()
    }

    /// Waits on `button` forever, stepping the session on each outcome.
    ///
    /// Returns `Ok` once the button source closes. A commit failure is
    /// returned immediately; it is not retried.
    pub fn run<B: ButtonSource>(&mut self, button: &mut B) -> Result<(), CaptureError> {
        tracing::info!(target: "capture", "[SESSION] Waiting for the capture button");

        loop {
            match button.wait(self.wait) {
                WaitOutcome::Closed => {
                    tracing::info!(target: "capture", "[SESSION] Button source closed, shutting down");
                    self.shutdown();
                    return Ok(());
                }
                outcome => self.step(outcome)?,
            }
        }
    }

    /// Advances the session by one wait outcome.
    pub fn step(&mut self, outcome: WaitOutcome) -> Result<(), CaptureError> {
        let event = match outcome {
            WaitOutcome::Fired => SessionEvent::ButtonFired,
            WaitOutcome::TimedOut => SessionEvent::WaitTimedOut {
                now: self.clock.now(),
            },
            WaitOutcome::Closed => return Ok(()),
        };
        self.dispatch(event)
    }

    /// Releases any open stream and returns to Idle.
    pub fn shutdown(&mut self) {
        self.close_stream();
        self.state = SessionState::Idle;
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<(), CaptureError> {
        let (next, effects) = transition(self.state, event);
        if next != self.state {
            tracing::debug!(target: "capture", "[SESSION] {:?} -> {:?} on {:?}", self.state, next, event);
            if let SessionEvent::WaitTimedOut { .. } = event {
                tracing::info!(target: "capture", "[SESSION] No release within the hold window, discarding capture");
            }
        }
        self.state = next;

        for effect in effects {
            self.execute(effect)?;
        }
        Ok(())
    }

    fn execute(&mut self, effect: SideEffect) -> Result<(), CaptureError> {
        match effect {
            SideEffect::OpenStream => {
                match FrameStreamSession::open(&mut self.source, self.geometry, STREAM_OPEN_TIMEOUT) {
                    Ok(stream) => {
                        self.stream = Some(stream);
                        let at = self.clock.now();
                        self.dispatch(SessionEvent::StreamOpened { at })
                    }
                    Err(e) => {
                        tracing::warn!(target: "capture", "[SESSION] Capture not started: {}", e);
                        self.dispatch(SessionEvent::StreamUnavailable)
                    }
                }
            }
            SideEffect::CommitCapture => {
                let tick = self.clock.now();
                let stream = self.stream.as_mut().ok_or(CaptureError::NoOpenStream)?;
                let path = commit_capture(stream, &self.fs, tick, &mut self.buffers)?;
                tracing::info!(target: "capture", "[SESSION] Capture saved to {:?}", path);
                self.last_capture = Some(path);
                self.dispatch(SessionEvent::CommitFinished)
            }
            SideEffect::CloseStream => {
                self.close_stream();
                Ok(())
            }
        }
    }

    fn close_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
    }
}
