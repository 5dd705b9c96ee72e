//! Reel Executor
//!
//! Runs untrusted, LLM-generated Manim scene source and turns the outcome into
//! a [`JobResult`](reel_core::domain::job::JobResult).
//!
//! Architecture:
//! - Sanitizer: textual rewrite of unsupported typesetting calls
//! - Workspace: one uniquely named working directory per job, always removed
//! - Sandbox: child process invocation under a wall-clock timeout
//! - Locator: picks the most recently written video in the media tree
//! - Classifier: maps exit codes and diagnostics to error categories
//! - Validator: cheap static checks that never execute anything
//!
//! The [`ExecutionService`] trait ties these together and is what the HTTP
//! server and the CLI depend on.

pub mod classifier;
pub mod config;
pub mod job;
pub mod limits;
pub mod locator;
pub mod sandbox;
pub mod sanitizer;
pub mod service;
pub mod validator;
pub mod workspace;

pub use config::ExecutorConfig;
pub use service::{ExecutionService, ManimExecutionService};
