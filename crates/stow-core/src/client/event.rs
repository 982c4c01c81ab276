use std::collections::HashMap;

use base64::prelude::*;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::ExtendedClient;
use crate::codec::{decode_reference, reserved_token, ObjectRef, RESERVED_ATTRIBUTE_NAME};
use crate::error::{CodecError, FinalizeError, ResolveError};
use crate::message::{Message, MessageAttribute};

/// Batch of queue records delivered to a serverless function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqsEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// One queue record as it appears in an event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub receipt_handle: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub message_attributes: HashMap<String, EventAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5_of_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(
        rename = "eventSourceARN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_source_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
}

/// Message attribute in event form. Binary values stay base64-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_value: Option<String>,
    #[serde(default)]
    pub data_type: String,
}

impl EventRecord {
    /// Decode the reserved attribute, if any.
    pub fn object_ref(&self) -> Result<Option<ObjectRef>, CodecError> {
        match self.message_attributes.get(RESERVED_ATTRIBUTE_NAME) {
            Some(attr) => decode_reference(Some(reserved_token(
                attr.string_value.as_deref(),
                &attr.data_type,
            )?)),
            None => Ok(None),
        }
    }

    /// The record as a queue message, as handed to a transform. Binary
    /// attribute values are base64-decoded; undecodable ones are dropped.
    pub fn to_message(&self) -> Message {
        let attributes = self
            .message_attributes
            .iter()
            .map(|(name, attr)| {
                let value = MessageAttribute {
                    data_type: attr.data_type.clone(),
                    string_value: attr.string_value.clone(),
                    binary_value: attr
                        .binary_value
                        .as_deref()
                        .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok()),
                };
                (name.clone(), value)
            })
            .collect();

        Message {
            message_id: self.message_id.clone(),
            receipt_handle: self.receipt_handle.clone(),
            body: self.body.clone(),
            attributes,
        }
    }
}

impl ExtendedClient {
    /// Replace an offloaded record's body with the stored content. Records
    /// without the reserved attribute are returned untouched.
    #[tracing::instrument(skip_all, fields(message_id = %record.message_id))]
    pub async fn resolve_record(&self, mut record: EventRecord) -> Result<EventRecord, ResolveError> {
        let Some(reference) = record.object_ref()? else {
            return Ok(record);
        };
        let content = self.fetch_body(&reference).await?;
        record.body = self.transform.recombine(&record.to_message(), Some(content));
        Ok(record)
    }

    /// Delete the stored body of an offloaded record. Call once the whole
    /// batch has been processed successfully.
    #[tracing::instrument(skip_all, fields(message_id = %record.message_id))]
    pub async fn finalize_record(&self, record: &EventRecord) -> Result<(), FinalizeError> {
        let Some(reference) = record.object_ref()? else {
            return Ok(());
        };
        self.store
            .delete_object(&reference.bucket, &reference.key)
            .await
            .map_err(|source| FinalizeError::Object {
                bucket: reference.bucket.clone(),
                key: reference.key.clone(),
                source,
            })?;
        tracing::info!(bucket = %reference.bucket, key = %reference.key, "deleted offloaded body");
        Ok(())
    }

    /// Resolve every record concurrently, one outcome per record in input
    /// order.
    pub async fn resolve_records(
        &self,
        records: Vec<EventRecord>,
    ) -> Vec<Result<EventRecord, ResolveError>> {
        join_all(records.into_iter().map(|r| self.resolve_record(r))).await
    }

    /// Finalize every record concurrently, one outcome per record in input
    /// order.
    pub async fn finalize_records(&self, records: &[EventRecord]) -> Vec<Result<(), FinalizeError>> {
        join_all(records.iter().map(|r| self.finalize_record(r))).await
    }
}
