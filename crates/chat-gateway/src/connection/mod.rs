//! Connection management
//!
//! Per-connection session state and its outbound queue.

mod session;

pub use session::{EnqueueError, Frame, Session, SessionId};
