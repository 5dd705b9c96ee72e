//! Data Transfer Objects for the HTTP API
//!
//! Request and response bodies exchanged between the render server and its
//! clients. Job results themselves are domain types and are sent as-is.

pub mod job;
pub mod server;
