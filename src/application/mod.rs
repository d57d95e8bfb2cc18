//! # Application Layer
//!
//! The realtime services: connection registry, presence tracker, event
//! router, session gate and message ingest.

pub mod realtime;
