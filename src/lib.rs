//! # Chat Realtime Library
//!
//! This crate provides the real-time side of a chat application:
//! - WebSocket endpoint authenticated from the `jwt` session cookie
//! - Multi-device connection registry and presence tracking
//! - Event fan-out to chat members (messages, typing, alerts)
//! - Message ingest that delivers first and persists in the background
//! - Internal HTTP API for the chat service to push events
//!
//! ## Architecture
//!
//! - **Domain Layer**: Identifiers, messages, outbound events and repository traits
//! - **Application Layer**: Registry, presence, router, session gate and ingest path
//! - **Infrastructure Layer**: PostgreSQL repositories, JWT verification, metrics
//! - **Presentation Layer**: HTTP routes and WebSocket gateway
//!
//! ## Module Structure
//!
//! ```text
//! chat_realtime/
//! +-- config/         Configuration management
//! +-- domain/         Entities, events and repository traits
//! +-- application/    Realtime core
//! +-- infrastructure/ Database, auth and metrics implementations
//! +-- presentation/   HTTP routes and WebSocket handlers
//! +-- shared/         Common error type
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer - Realtime core
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
