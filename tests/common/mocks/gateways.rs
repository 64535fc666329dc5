use async_trait::async_trait;
use messaging_backend::domain::Message;
use messaging_backend::infrastructure::gateways::{
    DeliveryError, NotificationGateway, PresenceGateway,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Presence double that records every push so tests can assert on the
/// delivery branch the service took.
#[derive(Default)]
pub struct RecordingPresenceGateway {
    online: Mutex<HashSet<Uuid>>,
    pub pushed_messages: Mutex<Vec<(Uuid, Uuid)>>,
    pub read_receipts: Mutex<Vec<(Uuid, Uuid, Uuid)>>,
}

impl RecordingPresenceGateway {
    pub fn set_online(&self, user_id: Uuid) {
        self.online
            .lock()
            .expect("online mutex poisoned")
            .insert(user_id);
    }

    pub fn pushed_message_count(&self) -> usize {
        self.pushed_messages
            .lock()
            .expect("pushed mutex poisoned")
            .len()
    }

    pub fn read_receipt_count(&self) -> usize {
        self.read_receipts
            .lock()
            .expect("receipts mutex poisoned")
            .len()
    }
}

#[async_trait]
impl PresenceGateway for RecordingPresenceGateway {
    async fn is_online(&self, user_id: Uuid) -> bool {
        self.online
            .lock()
            .expect("online mutex poisoned")
            .contains(&user_id)
    }

    async fn push_message(&self, recipient_id: Uuid, message: &Message) {
        self.pushed_messages
            .lock()
            .expect("pushed mutex poisoned")
            .push((recipient_id, message.id));
    }

    async fn push_read_receipt(&self, recipient_id: Uuid, conversation_id: Uuid, reader_id: Uuid) {
        self.read_receipts
            .lock()
            .expect("receipts mutex poisoned")
            .push((recipient_id, conversation_id, reader_id));
    }
}

/// Notification double with a failure switch for exercising the
/// log-and-swallow contract of the send path.
#[derive(Default)]
pub struct RecordingNotificationGateway {
    fail: AtomicBool,
    pub notified: Mutex<Vec<(Uuid, Uuid, Uuid)>>,
}

impl RecordingNotificationGateway {
    pub fn fail_next_deliveries(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn notified_count(&self) -> usize {
        self.notified
            .lock()
            .expect("notified mutex poisoned")
            .len()
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotificationGateway {
    async fn notify_new_message(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Transport("connection refused".to_string()));
        }

        self.notified
            .lock()
            .expect("notified mutex poisoned")
            .push((recipient_id, sender_id, message.id));
        Ok(())
    }
}
