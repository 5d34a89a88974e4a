//! Order lifecycle hooks.
//!
//! Subscribers are notified whenever one of the verification paths actually lands a terminal transition. Duplicate
//! notifications from the gateway, lost races and replays do not produce events.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
