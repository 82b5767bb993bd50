use crate::types::Event;
use async_trait::async_trait;

/// Receiver of every event the application emits
///
/// A listener is one of many; it must not assume it is the only consumer and
/// must absorb its own delivery failures.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn process_event(&self, event: &Event);

    /// Release held resources. Called once when the dispatcher shuts down.
    async fn shutdown(&self) -> crate::Result<()> {
        Ok(())
    }
}
