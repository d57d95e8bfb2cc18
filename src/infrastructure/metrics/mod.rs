//! Prometheus Metrics Module
//!
//! Provides gateway-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Active WebSocket connections and online users
//! - Events delivered, by event name
//! - Delivery faults (full or closed outbound queues), by event name
//! - Persistence faults after real-time delivery
//! - Rejected handshakes

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static WEBSOCKET_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("chat_realtime"),
    )
    .expect("Failed to create WEBSOCKET_CONNECTIONS_ACTIVE metric")
});

/// Users currently marked online
pub static ONLINE_USERS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("online_users", "Number of users marked online").namespace("chat_realtime"),
    )
    .expect("Failed to create ONLINE_USERS metric")
});

/// Events pushed onto connection queues
pub static EVENTS_DELIVERED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_delivered_total", "Events delivered to connections")
            .namespace("chat_realtime"),
        &["event"],
    )
    .expect("Failed to create EVENTS_DELIVERED_TOTAL metric")
});

/// Events dropped because a connection queue was full or closed
pub static DELIVERY_FAULTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("delivery_faults_total", "Events that could not be queued")
            .namespace("chat_realtime"),
        &["event"],
    )
    .expect("Failed to create DELIVERY_FAULTS_TOTAL metric")
});

/// Messages delivered in real time whose durable write failed
pub static PERSISTENCE_FAULTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "persistence_faults_total",
            "Messages delivered but not stored",
        )
        .namespace("chat_realtime"),
    )
    .expect("Failed to create PERSISTENCE_FAULTS_TOTAL metric")
});

/// Connection attempts refused by the session gate
pub static HANDSHAKES_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("handshakes_rejected_total", "Rejected connection attempts")
            .namespace("chat_realtime"),
    )
    .expect("Failed to create HANDSHAKES_REJECTED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WEBSOCKET_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WEBSOCKET_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(ONLINE_USERS.clone()))
        .expect("Failed to register ONLINE_USERS");
    registry
        .register(Box::new(EVENTS_DELIVERED_TOTAL.clone()))
        .expect("Failed to register EVENTS_DELIVERED_TOTAL");
    registry
        .register(Box::new(DELIVERY_FAULTS_TOTAL.clone()))
        .expect("Failed to register DELIVERY_FAULTS_TOTAL");
    registry
        .register(Box::new(PERSISTENCE_FAULTS_TOTAL.clone()))
        .expect("Failed to register PERSISTENCE_FAULTS_TOTAL");
    registry
        .register(Box::new(HANDSHAKES_REJECTED_TOTAL.clone()))
        .expect("Failed to register HANDSHAKES_REJECTED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_delivered(event: &str, count: usize) {
    if count > 0 {
        EVENTS_DELIVERED_TOTAL
            .with_label_values(&[event])
            .inc_by(count as u64);
    }
}

pub fn record_delivery_fault(event: &str) {
    DELIVERY_FAULTS_TOTAL.with_label_values(&[event]).inc();
}

pub fn record_persistence_fault() {
    PERSISTENCE_FAULTS_TOTAL.inc();
}

pub fn record_handshake_rejected() {
    HANDSHAKES_REJECTED_TOTAL.inc();
}

/// Helper to update connection and presence gauges
pub fn set_gateway_gauges(connections: usize, online_users: usize) {
    WEBSOCKET_CONNECTIONS_ACTIVE.set(connections as i64);
    ONLINE_USERS.set(online_users as i64);
}
