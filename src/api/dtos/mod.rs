mod common;
mod message_dto;

pub use common::Pagination;
pub use message_dto::{
    ConversationResponse, CreateConversationRequest, MarkReadResponse, MessageListResponse,
    MessageResponse, ParticipantResponse, SendMessageRequest,
};
