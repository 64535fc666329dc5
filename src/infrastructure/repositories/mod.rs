mod conversation_repository;
mod message_repository;
mod traits;
mod user_directory;

pub use conversation_repository::ConversationRepositoryImpl;
pub use message_repository::MessageRepositoryImpl;
pub use traits::{ConversationStore, MessageStore, UserDirectory};
pub use user_directory::UserDirectoryImpl;
