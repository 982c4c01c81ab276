use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Named message attributes as carried on the wire.
pub type Attributes = HashMap<String, MessageAttribute>;

/// A single typed message attribute. Exactly one of `string_value` or
/// `binary_value` is normally set; `data_type` is the queue's type tag
/// (`String`, `Number`, `Binary`, or a custom `String.foo` form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttribute {
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_value: Option<Vec<u8>>,
}

impl MessageAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }

    pub fn number(value: impl ToString) -> Self {
        Self {
            data_type: "Number".to_string(),
            string_value: Some(value.to_string()),
            binary_value: None,
        }
    }

    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        Self {
            data_type: "Binary".to_string(),
            string_value: None,
            binary_value: Some(value.into()),
        }
    }
}

/// A message as delivered by the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    /// Opaque token identifying this delivery, used for deletion.
    pub receipt_handle: String,
    pub body: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Outgoing message for [`Queue::send_message`](crate::queue::Queue::send_message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub queue_url: String,
    pub body: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<i32>,
}

impl SendMessageRequest {
    pub fn new(queue_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            body: body.into(),
            attributes: Attributes::new(),
            delay_seconds: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: MessageAttribute) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendMessageOutput {
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveMessageRequest {
    pub queue_url: String,
    /// Attribute names the caller wants returned. `All` or `.*` selects every
    /// attribute.
    #[serde(default)]
    pub attribute_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_messages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_timeout: Option<i32>,
}

impl ReceiveMessageRequest {
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            attribute_names: Vec::new(),
            max_number_of_messages: None,
            wait_time_seconds: None,
            visibility_timeout: None,
        }
    }

    pub fn with_max_messages(mut self, max: i32) -> Self {
        self.max_number_of_messages = Some(max);
        self
    }

    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_names.push(name.into());
        self
    }

    /// Whether the requested names select `name`, either explicitly or via a
    /// wildcard.
    pub fn selects_attribute(&self, name: &str) -> bool {
        self.attribute_names
            .iter()
            .any(|n| n == name || n == "All" || n == ".*")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMessageRequest {
    pub queue_url: String,
    pub receipt_handle: String,
}

impl DeleteMessageRequest {
    pub fn new(queue_url: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            receipt_handle: receipt_handle.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_attribute_names_select_everything() {
        let all = ReceiveMessageRequest::new("q").with_attribute_name("All");
        assert!(all.selects_attribute("anything"));

        let regex = ReceiveMessageRequest::new("q").with_attribute_name(".*");
        assert!(regex.selects_attribute("anything"));
    }

    #[test]
    fn explicit_attribute_names_select_only_themselves() {
        let req = ReceiveMessageRequest::new("q").with_attribute_name("trace-id");
        assert!(req.selects_attribute("trace-id"));
        assert!(!req.selects_attribute("tenant"));
        assert!(!ReceiveMessageRequest::new("q").selects_attribute("trace-id"));
    }

    #[test]
    fn attribute_constructors_set_type_tags() {
        assert_eq!(MessageAttribute::string("x").data_type, "String");
        assert_eq!(MessageAttribute::number(42).string_value.as_deref(), Some("42"));
        let bin = MessageAttribute::binary(vec![1, 2]);
        assert_eq!(bin.data_type, "Binary");
        assert_eq!(bin.binary_value, Some(vec![1, 2]));
        assert!(bin.string_value.is_none());
    }
}
