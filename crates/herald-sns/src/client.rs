//! Client seams
//!
//! The listener talks to SNS and S3 only through these traits so the offload
//! strategy and the SDK stay swappable.

use crate::error::PublishError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

/// Typed message attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttribute {
    pub data_type: String,
    pub string_value: String,
}

impl MessageAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: value.into(),
        }
    }

    pub fn number(value: impl ToString) -> Self {
        Self {
            data_type: "Number".to_string(),
            string_value: value.to_string(),
        }
    }
}

/// A single publish to a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub topic_arn: String,
    pub message: String,
    pub message_attributes: HashMap<String, MessageAttribute>,
}

impl PublishRequest {
    pub fn new(topic_arn: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            message: message.into(),
            message_attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: MessageAttribute) -> Self {
        self.message_attributes.insert(name.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResponse {
    pub message_id: String,
}

/// Something that can put a message on a topic
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, request: PublishRequest) -> Result<PublishResponse, PublishError>;
}

/// Object storage for offloaded payloads
#[async_trait]
pub trait PayloadStore: Send + Sync {
    async fn put_payload(&self, bucket: &str, key: &str, payload: Bytes)
        -> Result<(), PublishError>;
}

/// Long-lived network client that must be released exactly once
pub trait ClientHandle: Send + Sync {
    /// Name used in logs and errors
    fn resource_name(&self) -> &'static str;

    fn release(&self) -> herald_core::Result<()>;
}

/// Publisher that is also a releasable client
pub trait TopicClient: TopicPublisher + ClientHandle {}

impl<T: TopicPublisher + ClientHandle> TopicClient for T {}
