//! Realtime Core
//!
//! Connection tracking, presence, event routing, connection admission and the
//! message ingest path. Everything here is transport-agnostic: connections are
//! represented by a handle and an outbound event queue.

pub mod error;
pub mod ingest;
pub mod presence;
pub mod registry;
pub mod router;
pub mod session_gate;

pub use error::GatewayError;
pub use ingest::{IngestReceipt, MessageIngest, SendMessage, MAX_ATTACHMENTS};
pub use presence::PresenceTracker;
pub use registry::{ConnectionHandle, ConnectionRegistry, EventSender};
pub use router::{DeliveryReport, EventRouter};
pub use session_gate::{AuthError, IdentityVerifier, SessionGate};

#[cfg(test)]
pub use session_gate::MockIdentityVerifier;
