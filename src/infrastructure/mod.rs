//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - JWT identity verification
//! - Prometheus metrics

pub mod auth;
pub mod database;
pub mod metrics;
pub mod repositories;
