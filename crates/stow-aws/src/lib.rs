//! Amazon SQS and S3 implementations of the `stow-core` collaborator traits.

mod error;
mod s3;
mod sdk;
mod sqs;

pub use s3::S3ObjectStore;
pub use sdk::{load_sdk_config, AwsClients};
pub use sqs::SqsQueue;
