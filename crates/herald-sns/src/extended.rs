//! Extended publisher
//!
//! Stores message bodies in S3 and publishes a pointer in their place. The
//! pointer layout and the `ExtendedPayloadSize` attribute match the AWS
//! payload-offloading libraries so existing extended consumers can resolve it.

use crate::client::{
    ClientHandle, MessageAttribute, PayloadStore, PublishRequest, PublishResponse, TopicPublisher,
};
use crate::error::PublishError;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Attribute carrying the original body size of an offloaded message
pub const RESERVED_ATTRIBUTE_NAME: &str = "ExtendedPayloadSize";

/// Class tag written as the first element of the pointer array
pub const POINTER_CLASS: &str = "software.amazon.payloadoffloading.PayloadS3Pointer";

/// SNS attribute limit minus the reserved size attribute
pub const MAX_ALLOWED_ATTRIBUTES: usize = 10 - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedClientConfig {
    pub bucket_name: String,
    /// Offload every payload regardless of size
    pub always_through_s3: bool,
    /// Offload threshold in bytes, message plus attributes
    pub payload_size_threshold: usize,
}

impl ExtendedClientConfig {
    /// Every payload goes through `bucket_name`
    pub fn always_through_s3(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            always_through_s3: true,
            payload_size_threshold: herald_core::SNS_MAX_MESSAGE_SIZE,
        }
    }

    pub fn from_sns_config(config: &herald_core::SnsConfig) -> Self {
        Self {
            bucket_name: config.bucket_name.clone(),
            always_through_s3: config.always_through_s3,
            payload_size_threshold: config.payload_size_threshold,
        }
    }
}

/// Location of an offloaded payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadS3Pointer {
    pub s3_bucket_name: String,
    pub s3_key: String,
}

impl PayloadS3Pointer {
    /// `["<class>", {"s3BucketName": .., "s3Key": ..}]`
    pub fn to_json(&self) -> Result<String, PublishError> {
        serde_json::to_string(&(POINTER_CLASS, self))
            .map_err(|e| PublishError::InvalidRequest(format!("Failed to encode pointer: {}", e)))
    }

    pub fn from_json(json: &str) -> Option<Self> {
        let (class, pointer): (String, Self) = serde_json::from_str(json).ok()?;
        (class == POINTER_CLASS).then_some(pointer)
    }
}

/// Publisher that routes payloads through S3
pub struct ExtendedSnsClient {
    publisher: Arc<dyn TopicPublisher>,
    store: Arc<dyn PayloadStore>,
    config: ExtendedClientConfig,
    released: AtomicBool,
}

impl ExtendedSnsClient {
    pub fn new(
        publisher: Arc<dyn TopicPublisher>,
        store: Arc<dyn PayloadStore>,
        config: ExtendedClientConfig,
    ) -> Self {
        Self {
            publisher,
            store,
            config,
            released: AtomicBool::new(false),
        }
    }

    fn is_large(&self, request: &PublishRequest) -> bool {
        let attributes_size: usize = request
            .message_attributes
            .iter()
            .map(|(name, value)| name.len() + value.data_type.len() + value.string_value.len())
            .sum();

        request.message.len() + attributes_size > self.config.payload_size_threshold
    }

    fn check_attributes(request: &PublishRequest) -> Result<(), PublishError> {
        if request.message_attributes.contains_key(RESERVED_ATTRIBUTE_NAME) {
            return Err(PublishError::InvalidRequest(format!(
                "Message attribute name {} is reserved",
                RESERVED_ATTRIBUTE_NAME
            )));
        }
        if request.message_attributes.len() > MAX_ALLOWED_ATTRIBUTES {
            return Err(PublishError::InvalidRequest(format!(
                "Number of message attributes [{}] exceeds the maximum allowed [{}]",
                request.message_attributes.len(),
                MAX_ALLOWED_ATTRIBUTES
            )));
        }
        Ok(())
    }

    async fn offload(&self, mut request: PublishRequest) -> Result<PublishRequest, PublishError> {
        let bucket = &self.config.bucket_name;
        if bucket.is_empty() {
            return Err(PublishError::InvalidRequest(
                "Payload offload requires a bucket name".into(),
            ));
        }

        let key = Uuid::new_v4().to_string();
        let size = request.message.len();
        let body = Bytes::from(std::mem::take(&mut request.message));

        self.store
            .put_payload(bucket, &key, body)
            .await
            .map_err(|e| PublishError::Offload {
                bucket: bucket.clone(),
                key: key.clone(),
                source: Box::new(e),
            })?;

        debug!("Stored payload of {} bytes at s3://{}/{}", size, bucket, key);

        request.message = PayloadS3Pointer {
            s3_bucket_name: bucket.clone(),
            s3_key: key,
        }
        .to_json()?;

        Ok(request.with_attribute(RESERVED_ATTRIBUTE_NAME, MessageAttribute::number(size)))
    }
}

#[async_trait]
impl TopicPublisher for ExtendedSnsClient {
    async fn publish(&self, request: PublishRequest) -> Result<PublishResponse, PublishError> {
        if self.released.load(Ordering::Acquire) {
            return Err(PublishError::Released);
        }

        Self::check_attributes(&request)?;

        let request = if self.config.always_through_s3 || self.is_large(&request) {
            self.offload(request).await?
        } else {
            request
        };

        self.publisher.publish(request).await
    }
}

impl ClientHandle for ExtendedSnsClient {
    fn resource_name(&self) -> &'static str {
        "extended-sns"
    }

    fn release(&self) -> herald_core::Result<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Err(herald_core::Error::AlreadyReleased(self.resource_name()));
        }
        Ok(())
    }
}
