//! Event Dispatcher
//!
//! Hands each event to every registered listener.

use super::EventListener;
use crate::config::DispatcherConfig;
use crate::types::Event;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Event dispatcher configuration
#[derive(Debug, Clone)]
pub struct EventDispatcherConfig {
    /// Queue capacity
    pub queue_capacity: usize,
}

impl Default for EventDispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10000,
        }
    }
}

impl From<&DispatcherConfig> for EventDispatcherConfig {
    fn from(config: &DispatcherConfig) -> Self {
        Self {
            queue_capacity: config.queue_capacity.max(1),
        }
    }
}

/// Event dispatcher handle
pub struct EventDispatcher {
    sender: mpsc::Sender<Event>,
    worker: JoinHandle<()>,
    listeners: Arc<Vec<Arc<dyn EventListener>>>,
}

impl EventDispatcher {
    /// Create a new event dispatcher delivering to `listeners` in order
    pub fn new(config: EventDispatcherConfig, listeners: Vec<Arc<dyn EventListener>>) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let listeners = Arc::new(listeners);

        let worker = tokio::spawn(Self::dispatch_worker(receiver, listeners.clone()));

        Self {
            sender,
            worker,
            listeners,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Queue an event for delivery
    pub async fn dispatch(&self, event: Event) -> crate::Result<()> {
        if self.listeners.is_empty() {
            debug!("No listeners registered, dropping event {:?}", event.event_type());
            return Ok(());
        }

        self.sender
            .send(event)
            .await
            .map_err(|e| crate::Error::Dispatch(format!("Failed to queue event: {}", e)))
    }

    /// Deliver an event inline, bypassing the queue
    pub async fn dispatch_sync(&self, event: &Event) {
        Self::deliver(&self.listeners, event).await;
    }

    /// Drain queued events, then shut every listener down in registration order.
    ///
    /// All listeners are given the chance to release; the first failure is returned.
    pub async fn shutdown(self) -> crate::Result<()> {
        let Self {
            sender,
            worker,
            listeners,
        } = self;

        drop(sender);
        if let Err(e) = worker.await {
            error!("Event dispatch worker terminated abnormally: {}", e);
        }

        let mut first_error = None;
        for listener in listeners.iter() {
            if let Err(e) = listener.shutdown().await {
                error!(
                    code = e.code(),
                    "Failed to shut down listener {}: {}",
                    listener.name(),
                    e
                );
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn dispatch_worker(
        mut receiver: mpsc::Receiver<Event>,
        listeners: Arc<Vec<Arc<dyn EventListener>>>,
    ) {
        info!("Event dispatch worker started");

        while let Some(event) = receiver.recv().await {
            Self::deliver(&listeners, &event).await;
        }

        info!("Event dispatch worker stopped");
    }

    async fn deliver(listeners: &[Arc<dyn EventListener>], event: &Event) {
        for listener in listeners {
            debug!(
                "Delivering event {:?} to {}",
                event.event_type(),
                listener.name()
            );
            listener.process_event(event).await;
        }
    }
}
