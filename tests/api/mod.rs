//! HTTP endpoint tests

mod health_tests;
mod internal_tests;
mod socket_tests;
