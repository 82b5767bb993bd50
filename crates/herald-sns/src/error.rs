//! Publish error types

use aws_sdk_sns::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Failure to get a message onto the topic
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Dispatch failure: {0}")]
    Dispatch(String),

    #[error("Unparsable response: {0}")]
    Response(String),

    #[error("Request construction failed: {0}")]
    Construction(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to store payload at s3://{bucket}/{key}: {source}")]
    Offload {
        bucket: String,
        key: String,
        #[source]
        source: Box<PublishError>,
    },

    #[error("Client already released")]
    Released,
}

impl PublishError {
    /// Concrete failure kind, used to tag the error counter
    pub fn kind(&self) -> &str {
        match self {
            PublishError::Service { code, .. } => code,
            PublishError::Timeout(_) => "TimeoutError",
            PublishError::Dispatch(_) => "DispatchFailure",
            PublishError::Response(_) => "ResponseError",
            PublishError::Construction(_) => "ConstructionFailure",
            PublishError::InvalidRequest(_) => "InvalidRequest",
            PublishError::Offload { .. } => "PayloadOffloadError",
            PublishError::Released => "ClientReleased",
        }
    }
}

/// Map an SDK failure from either the SNS or the S3 client
pub fn from_sdk_error<E, R>(err: SdkError<E, R>) -> PublishError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(service) => {
            let inner = service.err();
            PublishError::Service {
                code: inner.code().unwrap_or("UnknownServiceError").to_string(),
                message: inner
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(inner).to_string()),
            }
        }
        SdkError::TimeoutError(_) => PublishError::Timeout(DisplayErrorContext(&err).to_string()),
        SdkError::DispatchFailure(_) => {
            PublishError::Dispatch(DisplayErrorContext(&err).to_string())
        }
        SdkError::ConstructionFailure(_) => {
            PublishError::Construction(DisplayErrorContext(&err).to_string())
        }
        _ => PublishError::Response(DisplayErrorContext(&err).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_uses_service_code() {
        let err = PublishError::Service {
            code: "NotFoundException".into(),
            message: "Topic does not exist".into(),
        };
        assert_eq!(err.kind(), "NotFoundException");
        assert_eq!(err.to_string(), "NotFoundException: Topic does not exist");
    }

    #[test]
    fn test_offload_kind_wraps_source() {
        let err = PublishError::Offload {
            bucket: "b1".into(),
            key: "k".into(),
            source: Box::new(PublishError::Timeout("slow".into())),
        };
        assert_eq!(err.kind(), "PayloadOffloadError");
        assert!(err.to_string().contains("s3://b1/k"));
        assert!(err.to_string().contains("slow"));
    }

    #[test]
    fn test_fixed_kinds() {
        assert_eq!(PublishError::Released.kind(), "ClientReleased");
        assert_eq!(PublishError::Dispatch("x".into()).kind(), "DispatchFailure");
        assert_eq!(
            PublishError::InvalidRequest("x".into()).kind(),
            "InvalidRequest"
        );
    }
}
