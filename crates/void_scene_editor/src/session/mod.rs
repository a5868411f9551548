//! Edit session: field commits, drags and echo suppression.

mod drag;
mod echo;
mod edit_session;
mod fields;

pub use drag::DragGesture;
pub use echo::{EchoGate, EchoGuard};
pub use edit_session::{CommitOutcome, EditSession, SessionError, SessionOptions};
pub use fields::{FieldBuffer, InspectorFields, NullFields};
