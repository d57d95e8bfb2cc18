//! Event Router
//!
//! Resolves target users to live connections and pushes an event onto each
//! connection's outbound queue. Delivery is fire-and-forget: no ack, no retry,
//! no ordering across recipients. Events to one connection keep the order in
//! which they were routed because each connection has a single queue.
//!
//! Targets are resolved into a local snapshot before anything is sent, so no
//! registry lock is held while pushing.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use super::error::GatewayError;
use super::registry::{ConnectionHandle, ConnectionRegistry};
use crate::domain::{ConnectionId, ServerEvent, UserId};
use crate::infrastructure::metrics;

/// Outcome of a single routing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

pub struct EventRouter {
    registry: Arc<ConnectionRegistry>,
}

impl EventRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to every live connection of the target users.
    pub fn deliver(&self, event: &ServerEvent, targets: &[UserId]) -> DeliveryReport {
        let handles = self.registry.resolve(targets);
        Self::push(event, handles)
    }

    /// Deliver to the target users, skipping one connection (usually the
    /// sender's own socket).
    pub fn deliver_except(
        &self,
        event: &ServerEvent,
        targets: &[UserId],
        except: ConnectionId,
    ) -> DeliveryReport {
        let handles = self
            .registry
            .resolve(targets)
            .into_iter()
            .filter(|h| h.connection_id != except)
            .collect();
        Self::push(event, handles)
    }

    /// Deliver to every live connection.
    pub fn broadcast(&self, event: &ServerEvent) -> DeliveryReport {
        Self::push(event, self.registry.all())
    }

    fn push(event: &ServerEvent, handles: Vec<Arc<ConnectionHandle>>) -> DeliveryReport {
        let event_name = event.event_name();
        let mut report = DeliveryReport::default();

        for handle in handles {
            let outcome = handle.sender.try_send(event.clone());
            if outcome.is_ok() {
                report.delivered += 1;
                continue;
            }

            report.failed += 1;
            metrics::record_delivery_fault(event_name);
            let fault = GatewayError::DeliveryFault(handle.connection_id);
            match outcome {
                Err(TrySendError::Full(_)) => tracing::warn!(
                    user_id = %handle.identity.user_id,
                    event = event_name,
                    error = %fault,
                    "Outbound queue full, event dropped"
                ),
                _ => tracing::debug!(
                    event = event_name,
                    error = %fault,
                    "Connection closing, event dropped"
                ),
            }
        }

        metrics::record_delivered(event_name, report.delivered);
        report
    }
}
