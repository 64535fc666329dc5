mod conversation_store;
mod gateways;
mod message_store;
mod user_directory;

pub use conversation_store::MockConversationStore;
pub use gateways::{RecordingNotificationGateway, RecordingPresenceGateway};
pub use message_store::MockMessageStore;
pub use user_directory::MockUserDirectory;
