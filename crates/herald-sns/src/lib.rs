//! Herald SNS
//!
//! Forwards application events to an SNS topic. Payloads travel through an
//! S3 bucket and only a pointer is published, following the layout of the
//! AWS extended client libraries.

pub mod aws;
pub mod client;
pub mod error;
pub mod extended;
pub mod listener;
pub mod mapper;
pub mod metrics;

pub use client::{
    ClientHandle, MessageAttribute, PayloadStore, PublishRequest, PublishResponse, TopicClient,
    TopicPublisher,
};
pub use error::PublishError;
pub use extended::{ExtendedClientConfig, ExtendedSnsClient, PayloadS3Pointer};
pub use listener::{SnsClients, SnsEventListener};
pub use mapper::{JsonMapper, SerdeJsonMapper};
