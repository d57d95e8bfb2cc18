//! Gateway behavior over in-memory stores.

mod connection_tests;
mod presence_tests;
