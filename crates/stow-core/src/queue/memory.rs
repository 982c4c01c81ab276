use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{QueueError, QueueResult};
use crate::message::{
    DeleteMessageRequest, Message, ReceiveMessageRequest, SendMessageOutput, SendMessageRequest,
};
use crate::queue::traits::Queue;

/// Largest batch a single receive returns, matching the hosted queue.
const MAX_RECEIVE_BATCH: usize = 10;

#[derive(Debug, Default)]
struct State {
    pending: VecDeque<Message>,
    in_flight: HashMap<String, Message>,
    sent: Vec<SendMessageRequest>,
    receive_requests: Vec<ReceiveMessageRequest>,
    deleted: Vec<String>,
}

/// In-process queue for tests and local runs.
///
/// Delivered messages stay in flight until deleted; there is no visibility
/// timeout. Every request is recorded for inspection.
#[derive(Debug)]
pub struct MemoryQueue {
    queue_url: String,
    state: Mutex<State>,
}

impl MemoryQueue {
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    /// Enqueue an already-formed message. Its receipt handle is returned
    /// verbatim on delivery.
    pub async fn push_message(&self, message: Message) {
        self.state.lock().await.pending.push_back(message);
    }

    /// Every request passed to `send_message`, in order.
    pub async fn sent(&self) -> Vec<SendMessageRequest> {
        self.state.lock().await.sent.clone()
    }

    /// Every request passed to `receive_message`, in order.
    pub async fn receive_requests(&self) -> Vec<ReceiveMessageRequest> {
        self.state.lock().await.receive_requests.clone()
    }

    /// Receipt handles acknowledged through `delete_message`, in order.
    pub async fn deleted(&self) -> Vec<String> {
        self.state.lock().await.deleted.clone()
    }

    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn in_flight_len(&self) -> usize {
        self.state.lock().await.in_flight.len()
    }

    fn check_queue(&self, queue_url: &str) -> QueueResult<()> {
        if queue_url == self.queue_url {
            Ok(())
        } else {
            Err(QueueError::QueueNotFound(queue_url.to_string()))
        }
    }
}

#[async_trait]
impl Queue for MemoryQueue {
    async fn send_message(&self, request: SendMessageRequest) -> QueueResult<SendMessageOutput> {
        self.check_queue(&request.queue_url)?;
        let message_id = Uuid::new_v4().to_string();

        let mut state = self.state.lock().await;
        state.pending.push_back(Message {
            message_id: message_id.clone(),
            receipt_handle: String::new(),
            body: request.body.clone(),
            attributes: request.attributes.clone(),
        });
        state.sent.push(request);

        Ok(SendMessageOutput {
            message_id: Some(message_id),
        })
    }

    async fn receive_message(&self, request: ReceiveMessageRequest) -> QueueResult<Vec<Message>> {
        self.check_queue(&request.queue_url)?;
        let max = request
            .max_number_of_messages
            .map(|n| usize::try_from(n).unwrap_or(1).clamp(1, MAX_RECEIVE_BATCH))
            .unwrap_or(1);

        let mut state = self.state.lock().await;
        let mut delivered = Vec::with_capacity(max);
        while delivered.len() < max {
            let Some(mut message) = state.pending.pop_front() else {
                break;
            };
            if message.receipt_handle.is_empty() {
                message.receipt_handle = Uuid::new_v4().to_string();
            }
            state
                .in_flight
                .insert(message.receipt_handle.clone(), message.clone());

            message
                .attributes
                .retain(|name, _| request.selects_attribute(name));
            delivered.push(message);
        }
        state.receive_requests.push(request);

        Ok(delivered)
    }

    async fn delete_message(&self, request: DeleteMessageRequest) -> QueueResult<()> {
        self.check_queue(&request.queue_url)?;
        let mut state = self.state.lock().await;
        if state.in_flight.remove(&request.receipt_handle).is_none() {
            return Err(QueueError::InvalidReceiptHandle(request.receipt_handle));
        }
        state.deleted.push(request.receipt_handle);
        Ok(())
    }
}
