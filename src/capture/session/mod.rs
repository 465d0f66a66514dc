mod commit;
mod service;
pub mod state;

pub use commit::commit_capture;
pub use service::CaptureService;
pub use state::{transition, SessionEvent, SessionState, SideEffect};
