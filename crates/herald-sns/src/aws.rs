//! AWS SDK backed clients

use crate::client::{ClientHandle, PayloadStore, PublishRequest, PublishResponse, TopicPublisher};
use crate::error::{from_sdk_error, PublishError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_sns::types::MessageAttributeValue;
use bytes::Bytes;
use herald_core::SnsConfig;
use parking_lot::RwLock;
use tracing::debug;

/// Load shared SDK settings, honouring region and endpoint overrides
pub async fn load_sdk_config(config: &SnsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// SNS client handle
pub struct AwsSnsClient {
    inner: RwLock<Option<aws_sdk_sns::Client>>,
}

impl AwsSnsClient {
    pub fn new(client: aws_sdk_sns::Client) -> Self {
        Self {
            inner: RwLock::new(Some(client)),
        }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(aws_sdk_sns::Client::new(sdk_config))
    }

    fn client(&self) -> Result<aws_sdk_sns::Client, PublishError> {
        self.inner.read().clone().ok_or(PublishError::Released)
    }
}

#[async_trait]
impl TopicPublisher for AwsSnsClient {
    async fn publish(&self, request: PublishRequest) -> Result<PublishResponse, PublishError> {
        let client = self.client()?;

        let mut builder = client
            .publish()
            .topic_arn(request.topic_arn)
            .message(request.message);

        for (name, attribute) in request.message_attributes {
            let value = MessageAttributeValue::builder()
                .data_type(attribute.data_type)
                .string_value(attribute.string_value)
                .build()
                .map_err(|e| PublishError::InvalidRequest(e.to_string()))?;
            builder = builder.message_attributes(name, value);
        }

        let output = builder.send().await.map_err(from_sdk_error)?;

        Ok(PublishResponse {
            message_id: output.message_id().unwrap_or_default().to_string(),
        })
    }
}

impl ClientHandle for AwsSnsClient {
    fn resource_name(&self) -> &'static str {
        "sns"
    }

    fn release(&self) -> herald_core::Result<()> {
        match self.inner.write().take() {
            Some(client) => {
                drop(client);
                debug!("Released SNS client");
                Ok(())
            }
            None => Err(herald_core::Error::AlreadyReleased(self.resource_name())),
        }
    }
}

/// S3 client handle used as payload storage
pub struct AwsS3Store {
    inner: RwLock<Option<aws_sdk_s3::Client>>,
}

impl AwsS3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self {
            inner: RwLock::new(Some(client)),
        }
    }

    /// Path-style addressing kicks in with an endpoint override
    pub fn from_sdk_config(sdk_config: &SdkConfig, path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(path_style)
            .build();

        Self::new(aws_sdk_s3::Client::from_conf(s3_config))
    }

    fn client(&self) -> Result<aws_sdk_s3::Client, PublishError> {
        self.inner.read().clone().ok_or(PublishError::Released)
    }
}

#[async_trait]
impl PayloadStore for AwsS3Store {
    async fn put_payload(
        &self,
        bucket: &str,
        key: &str,
        payload: Bytes,
    ) -> Result<(), PublishError> {
        let client = self.client()?;

        client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(payload))
            .send()
            .await
            .map_err(from_sdk_error)?;

        Ok(())
    }
}

impl ClientHandle for AwsS3Store {
    fn resource_name(&self) -> &'static str {
        "s3"
    }

    fn release(&self) -> herald_core::Result<()> {
        match self.inner.write().take() {
            Some(client) => {
                drop(client);
                debug!("Released S3 client");
                Ok(())
            }
            None => Err(herald_core::Error::AlreadyReleased(self.resource_name())),
        }
    }
}
