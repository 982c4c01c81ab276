use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::{Message as SdkMessage, MessageAttributeValue};
use aws_sdk_sqs::Client;
use stow_core::error::QueueResult;
use stow_core::{
    Attributes, DeleteMessageRequest, Message, MessageAttribute, Queue, QueueError,
    ReceiveMessageRequest, SendMessageOutput, SendMessageRequest,
};
use tracing::debug;

use crate::error::queue_error;

/// [`Queue`] backed by Amazon SQS.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
}

impl SqsQueue {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn to_sdk_attributes(
    attributes: Attributes,
) -> QueueResult<HashMap<String, MessageAttributeValue>> {
    attributes
        .into_iter()
        .map(|(name, attr)| {
            let value = MessageAttributeValue::builder()
                .data_type(attr.data_type)
                .set_string_value(attr.string_value)
                .set_binary_value(attr.binary_value.map(Blob::new))
                .build()
                .map_err(|e| QueueError::Rejected(format!("attribute {name}: {e}")))?;
            Ok((name, value))
        })
        .collect()
}

fn from_sdk_message(message: SdkMessage) -> Message {
    let attributes = message
        .message_attributes
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let attr = MessageAttribute {
                data_type: value.data_type().to_string(),
                string_value: value.string_value().map(str::to_string),
                binary_value: value.binary_value().cloned().map(Blob::into_inner),
            };
            (name, attr)
        })
        .collect();

    Message {
        message_id: message.message_id.unwrap_or_default(),
        receipt_handle: message.receipt_handle.unwrap_or_default(),
        body: message.body.unwrap_or_default(),
        attributes,
    }
}

#[async_trait]
impl Queue for SqsQueue {
    async fn send_message(&self, request: SendMessageRequest) -> QueueResult<SendMessageOutput> {
        let attributes = to_sdk_attributes(request.attributes)?;
        let output = self
            .client
            .send_message()
            .queue_url(request.queue_url)
            .message_body(request.body)
            .set_message_attributes((!attributes.is_empty()).then_some(attributes))
            .set_delay_seconds(request.delay_seconds)
            .send()
            .await
            .map_err(queue_error)?;

        debug!(message_id = ?output.message_id(), "sqs send_message");
        Ok(SendMessageOutput {
            message_id: output.message_id().map(str::to_string),
        })
    }

    async fn receive_message(&self, request: ReceiveMessageRequest) -> QueueResult<Vec<Message>> {
        let output = self
            .client
            .receive_message()
            .queue_url(request.queue_url)
            .set_message_attribute_names(Some(request.attribute_names))
            .set_max_number_of_messages(request.max_number_of_messages)
            .set_wait_time_seconds(request.wait_time_seconds)
            .set_visibility_timeout(request.visibility_timeout)
            .send()
            .await
            .map_err(queue_error)?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(from_sdk_message)
            .collect())
    }

    async fn delete_message(&self, request: DeleteMessageRequest) -> QueueResult<()> {
        self.client
            .delete_message()
            .queue_url(request.queue_url)
            .receipt_handle(request.receipt_handle)
            .send()
            .await
            .map_err(queue_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_convert_to_sdk_values() {
        let mut attributes = Attributes::new();
        attributes.insert("s".to_string(), MessageAttribute::string("text"));
        attributes.insert("b".to_string(), MessageAttribute::binary(vec![1, 2, 3]));

        let converted = to_sdk_attributes(attributes).unwrap();
        assert_eq!(converted["s"].data_type(), "String");
        assert_eq!(converted["s"].string_value(), Some("text"));
        assert_eq!(converted["b"].data_type(), "Binary");
        assert_eq!(
            converted["b"].binary_value().cloned().map(Blob::into_inner),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn sdk_message_converts_back() {
        let sdk = SdkMessage::builder()
            .message_id("id-1")
            .receipt_handle("handle")
            .body("body")
            .message_attributes(
                "S3MessageBodyKey",
                MessageAttributeValue::builder()
                    .data_type("String")
                    .string_value("(b)k")
                    .build()
                    .unwrap(),
            )
            .build();

        let message = from_sdk_message(sdk);
        assert_eq!(message.message_id, "id-1");
        assert_eq!(message.receipt_handle, "handle");
        assert_eq!(message.body, "body");
        assert_eq!(
            message.attributes["S3MessageBodyKey"],
            MessageAttribute::string("(b)k")
        );
    }
}
