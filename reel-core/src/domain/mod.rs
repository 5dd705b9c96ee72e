//! Core domain types
//!
//! These types are produced by the executor and travel unchanged through the
//! server to clients, so their serialized form is the public wire format.

pub mod job;
pub mod validation;
