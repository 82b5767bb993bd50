//! Herald Core Library
//!
//! Configuration, error types, the event model and the in-process
//! dispatcher shared by every Herald listener.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::{HeraldConfig, SnsConfig};
pub use error::{Error, Result};
pub use events::{EventDispatcher, EventDispatcherConfig, EventListener};
pub use types::{Event, Metadata};

/// Herald version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration namespace of the SNS listener
pub const SNS_CONFIG_PREFIX: &str = "sns";

/// Largest message SNS accepts inline (256 KiB)
pub const SNS_MAX_MESSAGE_SIZE: usize = 262_144;
