use tracing::{debug, info};

use super::ExtendedClient;
use crate::codec::{encode_reference, generate_key, reserved_token, RESERVED_ATTRIBUTE_NAME};
use crate::error::SendError;
use crate::message::{MessageAttribute, SendMessageOutput, SendMessageRequest};

impl ExtendedClient {
    /// Send a message, offloading its body first when the transform asks for
    /// it.
    ///
    /// The upload completes before the queue send starts, so a receiver never
    /// sees a reference to an object that does not exist yet. A message that
    /// already carries the reserved attribute is treated as offloaded and its
    /// reference is reused as the body without checking the object exists;
    /// one without a string value is rejected as malformed.
    #[tracing::instrument(skip_all, fields(queue_url = %request.queue_url))]
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<SendMessageOutput, SendError> {
        let bucket = self.bucket_name.as_deref().ok_or(SendError::MissingBucket)?;

        let split = self.transform.split(&request);
        let mut outgoing = request;

        let existing_reference = match outgoing.attributes.get(RESERVED_ATTRIBUTE_NAME) {
            Some(attr) => Some(
                reserved_token(attr.string_value.as_deref(), &attr.data_type)?.to_string(),
            ),
            None => None,
        };

        let upload = match (existing_reference, split.object_content) {
            (Some(reference), _) => {
                debug!(%reference, "message already offloaded, reusing reference");
                outgoing.body = reference;
                None
            }
            (None, None) => {
                if let Some(body) = split.message_body {
                    outgoing.body = body;
                }
                None
            }
            (None, Some(content)) => {
                let key = generate_key();
                outgoing.attributes.insert(
                    RESERVED_ATTRIBUTE_NAME.to_string(),
                    MessageAttribute::string(encode_reference(bucket, &key)),
                );
                outgoing.body = split.message_body.unwrap_or_else(|| key.clone());
                Some((key, content))
            }
        };

        if let Some((key, content)) = upload {
            let bytes = content.len();
            self.store
                .put_object(bucket, &key, content.into_bytes())
                .await
                .map_err(|source| SendError::Upload {
                    bucket: bucket.to_string(),
                    key: key.clone(),
                    source,
                })?;
            info!(%bucket, %key, bytes, "offloaded message body");
        }

        Ok(self.queue.send_message(outgoing).await?)
    }
}
