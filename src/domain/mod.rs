//! # Domain Layer
//!
//! Identities, messages, the server event vocabulary, and the repository
//! traits that describe the external persistence service.
//!
//! ## Structure
//!
//! - **entities**: Identity handles, messages, repository traits
//! - **events**: Events pushed to live connections
//!
//! Nothing here depends on the transport or on a concrete database.

pub mod entities;
pub mod events;

// Re-export commonly used types
pub use entities::*;
pub use events::ServerEvent;
