//! SNS Event Listener
//!
//! Publishes every event it receives to a single SNS topic.

use crate::aws::{load_sdk_config, AwsS3Store, AwsSnsClient};
use crate::client::{ClientHandle, PublishRequest, TopicClient};
use crate::extended::{ExtendedClientConfig, ExtendedSnsClient};
use crate::mapper::JsonMapper;
use async_trait::async_trait;
use herald_core::{Event, EventListener, SnsConfig};
use std::sync::Arc;
use tracing::{debug, error, info};

type SharedRecorder = Arc<dyn ::metrics::Recorder + Send + Sync>;

/// The three long-lived clients owned by the listener
pub struct SnsClients {
    pub sns: Arc<dyn ClientHandle>,
    pub s3: Arc<dyn ClientHandle>,
    pub extended: Arc<dyn TopicClient>,
}

impl SnsClients {
    /// Build SDK clients from the ambient AWS environment plus overrides in `config`
    pub async fn from_config(config: &SnsConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;

        let sns = Arc::new(AwsSnsClient::from_sdk_config(&sdk_config));
        let s3 = Arc::new(AwsS3Store::from_sdk_config(
            &sdk_config,
            config.endpoint_url.is_some(),
        ));
        let extended = Arc::new(ExtendedSnsClient::new(
            sns.clone(),
            s3.clone(),
            ExtendedClientConfig::from_sns_config(config),
        ));

        Self { sns, s3, extended }
    }
}

pub struct SnsEventListener {
    topic_arn: String,
    log_full_events: bool,
    clients: SnsClients,
    mapper: Arc<dyn JsonMapper>,
    recorder: SharedRecorder,
}

impl SnsEventListener {
    pub fn new(
        config: &SnsConfig,
        clients: SnsClients,
        mapper: Arc<dyn JsonMapper>,
        recorder: SharedRecorder,
    ) -> Self {
        crate::metrics::describe(recorder.as_ref());

        Self {
            topic_arn: config.topic_arn.clone(),
            log_full_events: config.log_full_events,
            clients,
            mapper,
            recorder,
        }
    }

    pub async fn from_config(
        config: &SnsConfig,
        mapper: Arc<dyn JsonMapper>,
        recorder: SharedRecorder,
    ) -> Self {
        let clients = SnsClients::from_config(config).await;
        Self::new(config, clients, mapper, recorder)
    }

    /// Publish an already serialized message; failures are logged and counted
    pub async fn publish_message_to_topic(&self, message: String) {
        let request = PublishRequest::new(self.topic_arn.clone(), message.clone());

        match self.clients.extended.publish(request).await {
            Ok(response) => {
                debug!("Message {} published", response.message_id);
                if self.log_full_events {
                    info!("{}", message);
                }
            }
            Err(e) => {
                error!(
                    kind = e.kind(),
                    "Failed to publish event to {}: {}", self.topic_arn, e
                );
                crate::metrics::record_send_error(self.recorder.as_ref(), e.kind());
            }
        }
    }

    /// Release the SNS, S3 and extended clients, stopping at the first failure
    pub fn release_clients(&self) -> herald_core::Result<()> {
        self.clients.sns.release()?;
        self.clients.s3.release()?;
        self.clients.extended.release()?;

        info!("Released SNS listener clients");
        Ok(())
    }
}

#[async_trait]
impl EventListener for SnsEventListener {
    fn name(&self) -> &str {
        herald_core::SNS_CONFIG_PREFIX
    }

    async fn process_event(&self, event: &Event) {
        info!("Processing Event through SNS topic {}", self.topic_arn);

        match self.mapper.write_value_as_string(event) {
            Ok(message) => self.publish_message_to_topic(message).await,
            Err(e) => error!("Failed to serialize event: {}", e),
        }
    }

    async fn shutdown(&self) -> herald_core::Result<()> {
        self.release_clients()
    }
}
