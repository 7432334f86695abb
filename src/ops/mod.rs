pub mod classify;
pub mod commit;
pub mod erase;
pub mod extension;
pub mod session;
pub mod title;

pub use extension::{ActionError, Activation, Extension};
pub use session::{EditSession, OpenOutcome, Response, SessionError, SessionOutcome};
