//! Deterministic, pure logic shared by the nodes.
//!
//! Core modules are free of I/O. They operate on in-memory values and return
//! deterministic outputs suitable for tests.

pub mod counter;
pub mod types;
pub mod wrap;
