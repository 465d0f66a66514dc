//! Capture button event sources.
//!
//! The capture button signals once when pressed and once when released. The
//! event loop only cares that a signal arrived within the wait window, so
//! both edges surface as [`WaitOutcome::Fired`].

use std::io::BufRead;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Result of waiting for the capture button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The button signalled within the wait window.
    Fired,
    /// Nothing happened.
    TimedOut,
    /// The event source is gone; no further events will arrive.
    Closed,
}

/// Which way the button moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

pub trait ButtonSource {
    /// Blocks for at most `timeout` waiting for the next button signal.
    fn wait(&mut self, timeout: Duration) -> WaitOutcome;
}

/// Button edges delivered over a channel.
pub struct ChannelButton {
    rx: Receiver<ButtonEdge>,
}

impl ChannelButton {
    pub fn new(rx: Receiver<ButtonEdge>) -> Self {
        Self { rx }
    }
}

impl ButtonSource for ChannelButton {
    fn wait(&mut self, timeout: Duration) -> WaitOutcome {
        match self.rx.recv_timeout(timeout) {
            Ok(edge) => {
                tracing::trace!(target: "capture", "[BUTTON] {:?}", edge);
                WaitOutcome::Fired
            }
            Err(RecvTimeoutError::Timeout) => WaitOutcome::TimedOut,
            Err(RecvTimeoutError::Disconnected) => WaitOutcome::Closed,
        }
    }
}

/// Sends one edge per line of `reader`, alternating press and release,
/// until input ends or the receiver goes away.
pub fn forward_line_edges<R: BufRead>(reader: R, tx: &Sender<ButtonEdge>) {
    let mut pressed = false;
    for line in reader.lines() {
        if line.is_err() {
            break;
        }
        pressed = !pressed;
        let edge = if pressed {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released
        };
        if tx.send(edge).is_err() {
            break;
        }
    }
}

#[cfg(all(feature = "desktop", target_os = "linux"))]
pub use hotkey::HotkeyButton;

/// Only Linux delivers `global-hotkey` events without a platform event loop
/// pumping the main thread, which this service never runs.
#[cfg(all(feature = "desktop", target_os = "linux"))]
mod hotkey {
    use std::time::{Duration, Instant};

    use crossbeam_channel::RecvTimeoutError;
    use global_hotkey::hotkey::HotKey;
    use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager};

    use super::{ButtonSource, WaitOutcome};
    use crate::capture::errors::ButtonError;

    /// A global keyboard shortcut standing in for the hardware capture button.
    pub struct HotkeyButton {
        // Unregisters the hotkey when dropped
        _manager: GlobalHotKeyManager,
        hotkey_id: u32,
    }

    impl HotkeyButton {
        pub fn register(hotkey: HotKey) -> Result<Self, ButtonError> {
            let hotkey_id = hotkey.id();
            let manager = GlobalHotKeyManager::new().map_err(|e| ButtonError::Register(e.to_string()))?;
            manager
                .register(hotkey)
                .map_err(|e| ButtonError::Register(e.to_string()))?;

            tracing::info!(target: "capture", "[BUTTON] Registered capture key (id={})", hotkey_id);
            Ok(Self {
                _manager: manager,
                hotkey_id,
            })
        }
    }

    impl ButtonSource for HotkeyButton {
        fn wait(&mut self, timeout: Duration) -> WaitOutcome {
            let deadline = Instant::now() + timeout;
            let receiver = GlobalHotKeyEvent::receiver();

            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(remaining) {
                    Ok(event) if event.id == self.hotkey_id => {
                        tracing::trace!(target: "capture", "[BUTTON] {:?}", event.state);
                        return WaitOutcome::Fired;
                    }
                    // Some other application's hotkey
                    Ok(_) => continue,
                    Err(RecvTimeoutError::Timeout) => return WaitOutcome::TimedOut,
                    Err(RecvTimeoutError::Disconnected) => return WaitOutcome::Closed,
                }
            }
        }
    }
}
