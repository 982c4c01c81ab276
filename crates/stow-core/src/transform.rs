use std::fmt;

use crate::message::{Message, SendMessageRequest};
use crate::size::{is_large, DEFAULT_SIZE_THRESHOLD_BYTES};

/// How an outgoing message is split between the queue and the object store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendSplit {
    /// Body to put on the queue. `None` keeps the original body when nothing
    /// is offloaded, or substitutes the object key when something is.
    pub message_body: Option<String>,
    /// Content to upload. `None` means the message is not offloaded.
    pub object_content: Option<String>,
}

impl SendSplit {
    /// Send the message as-is.
    pub fn inline() -> Self {
        Self::default()
    }

    /// Upload `content` and leave only the object key on the queue.
    pub fn offload(content: impl Into<String>) -> Self {
        Self {
            message_body: None,
            object_content: Some(content.into()),
        }
    }
}

/// Hooks deciding what is offloaded on send and how bodies are rebuilt on
/// receive.
///
/// Installing a custom transform replaces the size-threshold logic entirely.
pub trait Transform: Send + Sync + fmt::Debug {
    /// Split an outgoing message into queue body and object content.
    fn split(&self, message: &SendMessageRequest) -> SendSplit;

    /// Rebuild the body of a received message from the message as delivered
    /// and the stored content. `object_content` is `None` when the message
    /// was not offloaded.
    ///
    /// [`ExtendedClient::receive_message`](crate::ExtendedClient::receive_message)
    /// calls this for every message, offloaded or not.
    /// [`ExtendedClient::resolve_record`](crate::ExtendedClient::resolve_record)
    /// calls it only for offloaded records and returns the rest untouched.
    fn recombine(&self, message: &Message, object_content: Option<String>) -> String;
}

/// Offloads the whole body once the message reaches a size threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeThreshold {
    pub always_offload: bool,
    pub threshold_bytes: usize,
}

impl Default for SizeThreshold {
    fn default() -> Self {
        Self {
            always_offload: false,
            threshold_bytes: DEFAULT_SIZE_THRESHOLD_BYTES,
        }
    }
}

impl Transform for SizeThreshold {
    fn split(&self, message: &SendMessageRequest) -> SendSplit {
        if self.always_offload || is_large(&message.body, &message.attributes, self.threshold_bytes)
        {
            SendSplit::offload(message.body.clone())
        } else {
            SendSplit::inline()
        }
    }

    fn recombine(&self, message: &Message, object_content: Option<String>) -> String {
        object_content.unwrap_or_else(|| message.body.clone())
    }
}
