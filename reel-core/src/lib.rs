//! Reel Core
//!
//! Core types shared by the Reel render service and its clients.
//!
//! This crate contains:
//! - Domain types: job results, error categories, validation reports
//! - DTOs: request and response bodies of the HTTP API

pub mod domain;
pub mod dto;
