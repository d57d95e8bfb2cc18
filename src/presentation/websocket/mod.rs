//! WebSocket Gateway
//!
//! Real-time communication via WebSocket connections.

pub mod gateway;
pub mod handler;
pub mod messages;
pub mod session;

pub use gateway::{ClientContext, Gateway, GatewayConfig};
pub use handler::{ws_handler, AUTH_COOKIE};
pub use messages::ClientEvent;
pub use session::{ConnectionState, SessionState};
