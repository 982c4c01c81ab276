//! Transparent object-store offloading for queue messages that exceed the
//! queue's size limit.
//!
//! [`ExtendedClient`] wraps a [`Queue`] and an [`ObjectStore`]. Small messages
//! flow through the queue unchanged; large ones are uploaded and replaced by a
//! reference in the [`RESERVED_ATTRIBUTE_NAME`] attribute, restored on
//! receive, and removed from the store on delete.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod message;
pub mod queue;
pub mod size;
pub mod store;
pub mod telemetry;
pub mod transform;

pub use client::{
    EventAttribute, EventRecord, ExtendedClient, ExtendedClientBuilder, ReceiveBatch, SqsEvent,
};
pub use codec::{ObjectRef, UnwrappedHandle, RESERVED_ATTRIBUTE_NAME};
pub use config::ClientConfig;
pub use error::{
    CodecError, ConfigError, DeleteError, FinalizeError, ObjectStoreError, QueueError,
    ReceiveError, ResolveError, SendError,
};
pub use message::{
    Attributes, DeleteMessageRequest, Message, MessageAttribute, ReceiveMessageRequest,
    SendMessageOutput, SendMessageRequest,
};
pub use queue::{MemoryQueue, Queue};
pub use store::{MemoryObjectStore, ObjectStore};
pub use transform::{SendSplit, SizeThreshold, Transform};
