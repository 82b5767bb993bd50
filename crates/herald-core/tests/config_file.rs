use herald_core::HeraldConfig;
use std::io::Write;

#[test]
fn test_full_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[sns]
enabled = true
topic_arn = "arn:aws:sns:us-east-1:123456789012:pipeline-events"
bucket_name = "pipeline-event-payloads"
log_full_events = true
region = "us-east-1"
endpoint_url = "http://localhost:4566"
always_through_s3 = false
payload_size_threshold = 1024

[logging]
level = "debug"
format = "json"

[metrics]
listen = "127.0.0.1:9464"

[dispatcher]
queue_capacity = 16
"#
    )
    .unwrap();

    let config = HeraldConfig::from_file(file.path().to_str().unwrap()).unwrap();

    assert!(config.sns.enabled);
    assert_eq!(
        config.sns.topic_arn,
        "arn:aws:sns:us-east-1:123456789012:pipeline-events"
    );
    assert_eq!(config.sns.bucket_name, "pipeline-event-payloads");
    assert!(config.sns.log_full_events);
    assert_eq!(config.sns.endpoint_url.as_deref(), Some("http://localhost:4566"));
    assert!(!config.sns.always_through_s3);
    assert_eq!(config.sns.payload_size_threshold, 1024);
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.metrics.listen.as_deref(), Some("127.0.0.1:9464"));
    assert_eq!(config.dispatcher.queue_capacity, 16);
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();

    let config = HeraldConfig::from_file(file.path().to_str().unwrap()).unwrap();

    assert!(!config.sns.enabled);
    assert!(!config.sns.log_full_events);
    assert_eq!(config.logging.level, "info");
}
