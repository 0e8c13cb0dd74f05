//! Dialogue Session Engine domain types.
//!
//! The per-actor conversational state machine that walks the field schema in
//! order, branches into free-text capture on the "custom value" escape,
//! collects photos until an explicit completion signal, then offers review
//! with publish / single-field edit / cancel. Orchestration against the
//! stores lives in `application::handlers`; the types here are pure.

mod config;
mod phase;
mod reply;
mod session;
mod signal;

pub use config::DialogueConfig;
pub use phase::DialoguePhase;
pub use reply::Reply;
pub use session::DialogueSession;
pub use signal::{actions, Signal};
