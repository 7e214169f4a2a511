// Profile form core: tag list, validation, export and the event dispatcher.
// Nothing outside handlers.rs knows about HTTP.

pub mod counter;
pub mod events;
pub mod export;
pub mod handlers;
pub mod preview;
pub mod tags;
pub mod theme;
pub mod validation;

pub use events::{EventOutcome, FormEvent, FormSession, LogSubmitAction, SubmitAction};
pub use validation::Validator;
