//! Service layer
//!
//! The execution service is what the HTTP boundary and the CLI talk to. It is
//! trait-based so handlers can be tested against a stub.

mod execution;

pub use execution::ExecutionService;

pub use execution::ManimExecutionService;
