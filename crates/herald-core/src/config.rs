//! Configuration for Herald
//!
//! Example config:
//! ```toml
//! [sns]
//! enabled = true
//! topic_arn = "arn:aws:sns:us-east-1:123456789012:pipeline-events"
//! bucket_name = "pipeline-event-payloads"
//! log_full_events = false
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//!
//! [metrics]
//! listen = "0.0.0.0:9464"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeraldConfig {
    #[serde(default)]
    pub sns: SnsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

impl HeraldConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Override fields from `HERALD_*` variables resolved through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(enabled) = lookup("HERALD_SNS_ENABLED").as_deref().and_then(parse_bool) {
            self.sns.enabled = enabled;
        }
        if let Some(arn) = lookup("HERALD_SNS_TOPIC_ARN") {
            self.sns.topic_arn = arn;
        }
        if let Some(bucket) = lookup("HERALD_SNS_BUCKET_NAME") {
            self.sns.bucket_name = bucket;
        }
        if let Some(full) = lookup("HERALD_SNS_LOG_FULL_EVENTS")
            .as_deref()
            .and_then(parse_bool)
        {
            self.sns.log_full_events = full;
        }
        if let Some(region) = lookup("HERALD_SNS_REGION") {
            self.sns.region = Some(region);
        }
        if let Some(endpoint) = lookup("HERALD_SNS_ENDPOINT_URL") {
            self.sns.endpoint_url = Some(endpoint);
        }
        if let Some(level) = lookup("HERALD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(addr) = lookup("HERALD_METRICS_LISTEN") {
            self.metrics.listen = Some(addr);
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// SNS listener settings, bound from the `sns` namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsConfig {
    /// Register the SNS listener at startup
    #[serde(default)]
    pub enabled: bool,

    /// Destination topic
    #[serde(default, alias = "topicArn")]
    pub topic_arn: String,

    /// Bucket receiving offloaded payloads
    #[serde(default, alias = "bucketName")]
    pub bucket_name: String,

    /// Log every published body at info level
    #[serde(default, alias = "logFullEvents")]
    pub log_full_events: bool,

    /// Region override for the SDK clients
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override for the SDK clients (LocalStack and friends)
    #[serde(default, alias = "endpointUrl")]
    pub endpoint_url: Option<String>,

    /// Route every payload through the bucket regardless of size
    #[serde(default = "default_true", alias = "alwaysThroughS3")]
    pub always_through_s3: bool,

    /// Offload threshold in bytes when `always_through_s3` is off
    #[serde(default = "default_payload_size_threshold", alias = "payloadSizeThreshold")]
    pub payload_size_threshold: usize,
}

fn default_true() -> bool {
    true
}

fn default_payload_size_threshold() -> usize {
    crate::SNS_MAX_MESSAGE_SIZE
}

impl Default for SnsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            topic_arn: String::new(),
            bucket_name: String::new(),
            log_full_events: false,
            region: None,
            endpoint_url: None,
            always_through_s3: default_true(),
            payload_size_threshold: default_payload_size_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Address serving `/metrics`; exporter stays in-process when unset
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Events buffered ahead of the delivery worker
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HeraldConfig::default();
        assert!(!config.sns.enabled);
        assert!(!config.sns.log_full_events);
        assert!(config.sns.always_through_s3);
        assert_eq!(config.sns.payload_size_threshold, 262_144);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.dispatcher.queue_capacity, 10_000);
        assert!(config.metrics.listen.is_none());
    }

    #[test]
    fn test_parse_sns_section() {
        let config = HeraldConfig::from_toml(
            r#"
            [sns]
            enabled = true
            topic_arn = "arn:aws:sns:us-east-1:1:topic"
            bucket_name = "b1"
            "#,
        )
        .unwrap();

        assert!(config.sns.enabled);
        assert_eq!(config.sns.topic_arn, "arn:aws:sns:us-east-1:1:topic");
        assert_eq!(config.sns.bucket_name, "b1");
        assert!(!config.sns.log_full_events);
        assert!(config.sns.always_through_s3);
    }

    #[test]
    fn test_parse_camel_case_keys() {
        let config = HeraldConfig::from_toml(
            r#"
            [sns]
            enabled = true
            topicArn = "arn:aws:sns:us-east-1:1:topic"
            bucketName = "b1"
            logFullEvents = true
            "#,
        )
        .unwrap();

        assert_eq!(config.sns.topic_arn, "arn:aws:sns:us-east-1:1:topic");
        assert_eq!(config.sns.bucket_name, "b1");
        assert!(config.sns.log_full_events);
    }

    #[test]
    fn test_enabled_without_topic_still_binds() {
        let config = HeraldConfig::from_toml("[sns]\nenabled = true\n").unwrap();
        assert!(config.sns.enabled);
        assert!(config.sns.topic_arn.is_empty());
        assert!(config.sns.bucket_name.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let err = HeraldConfig::from_toml("[sns\nenabled = true").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sns]\nenabled = true\nbucket_name = \"payloads\"").unwrap();

        let config = HeraldConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert!(config.sns.enabled);
        assert_eq!(config.sns.bucket_name, "payloads");
    }

    #[test]
    fn test_from_missing_file() {
        assert!(HeraldConfig::from_file("/nonexistent/herald.toml").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HERALD_SNS_ENABLED", "TRUE"),
            ("HERALD_SNS_TOPIC_ARN", "arn:aws:sns:eu-west-1:1:events"),
            ("HERALD_SNS_BUCKET_NAME", "bucket"),
            ("HERALD_SNS_LOG_FULL_EVENTS", "1"),
            ("HERALD_SNS_REGION", "eu-west-1"),
            ("HERALD_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = HeraldConfig::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.sns.enabled);
        assert_eq!(config.sns.topic_arn, "arn:aws:sns:eu-west-1:1:events");
        assert_eq!(config.sns.bucket_name, "bucket");
        assert!(config.sns.log_full_events);
        assert_eq!(config.sns.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_ignores_unparsable_bool() {
        let mut config = HeraldConfig::default();
        config.sns.enabled = true;
        config.apply_env(|key| (key == "HERALD_SNS_ENABLED").then(|| "maybe".to_string()));
        assert!(config.sns.enabled);
    }
}
