//! Wire encodings for offloaded message bodies.
//!
//! Two tokens travel with an offloaded message:
//! - the reserved attribute value, `({bucket}){key}`, set at send time
//! - the wrapped receipt handle,
//!   `{BUCKET_MARKER}{bucket}{BUCKET_MARKER}{KEY_MARKER}{key}{KEY_MARKER}{handle}`,
//!   minted at receive time so delete can find the object again.
//!
//! The literals below are part of the wire contract shared with other
//! extended clients and must not change. The marker format breaks if a bucket,
//! key or handle itself contains a marker literal.

use uuid::Uuid;

use crate::error::CodecError;
use crate::message::Attributes;

/// Message attribute marking a body that lives in the object store.
pub const RESERVED_ATTRIBUTE_NAME: &str = "S3MessageBodyKey";

pub const BUCKET_MARKER: &str = "-..s3BucketName..-";
pub const KEY_MARKER: &str = "-..s3Key..-";

/// Location of an offloaded message body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Receipt handle split back into its parts.
///
/// `bucket` and `key` are `None` for pass-through handles that were never
/// wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrappedHandle {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub receipt_handle: String,
}

/// Mint a fresh object key (random UUIDv4). Never derived from content.
pub fn generate_key() -> String {
    Uuid::new_v4().to_string()
}

/// Encode a reference as `({bucket}){key}`.
pub fn encode_reference(bucket: &str, key: &str) -> String {
    format!("({bucket}){key}")
}

/// Decode the reserved attribute value.
///
/// `None` means the message was not offloaded. A present value that is not
/// `({bucket}){key}` with a non-empty bucket and key is an error.
pub fn decode_reference(token: Option<&str>) -> Result<Option<ObjectRef>, CodecError> {
    let Some(token) = token else {
        return Ok(None);
    };

    let (bucket, key) = token
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(')'))
        .ok_or_else(|| CodecError::MalformedReference(token.to_string()))?;

    if bucket.is_empty() || key.is_empty() {
        return Err(CodecError::MalformedReference(token.to_string()));
    }

    Ok(Some(ObjectRef::new(bucket, key)))
}

/// String value of a reserved attribute that is present on a message.
///
/// A reserved attribute carrying a binary value or no value at all still
/// marks the message as offloaded, so it is malformed rather than absent.
pub fn reserved_token<'a>(
    string_value: Option<&'a str>,
    data_type: &str,
) -> Result<&'a str, CodecError> {
    string_value.ok_or_else(|| CodecError::MalformedReference(format!("<{data_type} value>")))
}

/// Decode the reserved attribute from a message's attributes.
pub fn reference_in(attributes: &Attributes) -> Result<Option<ObjectRef>, CodecError> {
    match attributes.get(RESERVED_ATTRIBUTE_NAME) {
        Some(attr) => {
            decode_reference(Some(reserved_token(attr.string_value.as_deref(), &attr.data_type)?))
        }
        None => Ok(None),
    }
}

/// Embed `bucket` and `key` ahead of the queue's original receipt handle.
pub fn wrap_receipt_handle(bucket: &str, key: &str, receipt_handle: &str) -> String {
    let mut wrapped = String::with_capacity(
        2 * BUCKET_MARKER.len()
            + 2 * KEY_MARKER.len()
            + bucket.len()
            + key.len()
            + receipt_handle.len(),
    );
    wrapped.push_str(BUCKET_MARKER);
    wrapped.push_str(bucket);
    wrapped.push_str(BUCKET_MARKER);
    wrapped.push_str(KEY_MARKER);
    wrapped.push_str(key);
    wrapped.push_str(KEY_MARKER);
    wrapped.push_str(receipt_handle);
    wrapped
}

/// Text strictly between the first two occurrences of `marker` in `haystack`.
fn between_markers<'a>(haystack: &'a str, marker: &str) -> Option<(&'a str, usize)> {
    let start = haystack.find(marker)? + marker.len();
    let len = haystack[start..].find(marker)?;
    Some((&haystack[start..start + len], start + len + marker.len()))
}

/// Reverse [`wrap_receipt_handle`].
///
/// Handles without a complete pair of key markers pass through unchanged.
/// Bucket markers are optional; when missing, `bucket` is `None`.
pub fn unwrap_receipt_handle(token: &str) -> UnwrappedHandle {
    let Some((key, handle_start)) = between_markers(token, KEY_MARKER) else {
        return UnwrappedHandle {
            bucket: None,
            key: None,
            receipt_handle: token.to_string(),
        };
    };

    // Bucket markers precede the key markers; never look inside the handle.
    let prefix_end = token.find(KEY_MARKER).unwrap_or(0);
    let bucket = between_markers(&token[..prefix_end], BUCKET_MARKER)
        .map(|(bucket, _)| bucket.to_string());

    UnwrappedHandle {
        bucket,
        key: Some(key.to_string()),
        receipt_handle: token[handle_start..].to_string(),
    }
}
