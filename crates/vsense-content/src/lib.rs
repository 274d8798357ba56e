//! Page session: follows the watchable video, tracks watch time, and drives
//! the save control

mod context;
mod control;
mod runtime;
mod session;

pub use context::{ActiveContext, Generation, Phase};
pub use control::{
    outcome_notice, ControlState, Finished, Notice, NoticeKind, RequestToken, SaveControl,
    StoreOutcome, ToggleIntent,
};
pub use runtime::{ContentRuntime, ControlSurface, HostEvent, Notifier, RuntimeHandle};
pub use session::{ContentSession, Effect, PlaybackEvent, StoreRequest};
