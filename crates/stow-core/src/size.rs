//! Wire-size estimation for outgoing messages.

use crate::message::{Attributes, MessageAttribute};

/// Default offload threshold: 256 KiB, the queue's historical per-message limit.
pub const DEFAULT_SIZE_THRESHOLD_BYTES: usize = 262_144;

/// Bytes one attribute contributes: name, type tag, and value. A string value
/// takes precedence over a binary value when both are set.
fn attribute_size(name: &str, attribute: &MessageAttribute) -> usize {
    let value_len = match (&attribute.string_value, &attribute.binary_value) {
        (Some(s), _) => s.len(),
        (None, Some(b)) => b.len(),
        (None, None) => 0,
    };
    name.len() + attribute.data_type.len() + value_len
}

/// Total wire size of a message in bytes: every attribute plus the UTF-8 body.
pub fn message_size(body: &str, attributes: &Attributes) -> usize {
    let attributes_size: usize = attributes
        .iter()
        .map(|(name, attribute)| attribute_size(name, attribute))
        .sum();
    attributes_size + body.len()
}

/// Whether a message of this shape must be offloaded under `threshold`.
pub fn is_large(body: &str, attributes: &Attributes, threshold: usize) -> bool {
    message_size(body, attributes) >= threshold
}
