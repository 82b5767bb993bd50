//! Event delivery module
//!
//! Handles fan-out of application events including:
//! - Listener registration at startup
//! - Queued delivery through a background worker
//! - Ordered listener teardown on shutdown

mod dispatcher;
mod listener;

pub use dispatcher::{EventDispatcher, EventDispatcherConfig};
pub use listener::EventListener;
