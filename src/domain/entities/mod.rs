//! Domain Entities
//!
//! Identity handles, messages, and the repository traits the gateway reads
//! and writes through.

pub mod chat;
pub mod identity;
pub mod message;
pub mod user;

pub use chat::ChatRepository;
pub use identity::{ChatId, ConnectionId, Identity, UserId};
pub use message::{
    Attachment, MessageRepository, MessageSender, NewMessageRecord, OutboundMessage,
};
pub use user::{User, UserRepository};

#[cfg(test)]
pub use chat::MockChatRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use user::MockUserRepository;
