//! The application layer: the async dispatch shell and the event bus it
//! publishes to. Everything here depends on `domain`; nothing in `domain`
//! depends back on this module.

pub mod callback_bus;
pub mod engine;

pub use callback_bus::Event;
pub use engine::{Engine, RunContext};
