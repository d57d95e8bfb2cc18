//! Identity Verification
//!
//! Credential verifiers used by the session gate.

pub mod jwt_verifier;

pub use jwt_verifier::{Claims, JwtIdentityVerifier};
