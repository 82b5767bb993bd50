//! Event to wire format conversion

use herald_core::Event;

/// Turns events into the JSON body sent to the topic
pub trait JsonMapper: Send + Sync {
    fn write_value_as_string(&self, event: &Event) -> herald_core::Result<String>;
}

/// Compact `serde_json` rendering of the event
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonMapper;

impl JsonMapper for SerdeJsonMapper {
    fn write_value_as_string(&self, event: &Event) -> herald_core::Result<String> {
        Ok(serde_json::to_string(event)?)
    }
}
