//! Tracing/logging setup shared by the binaries.

pub mod tracing;

pub use self::tracing::{LogFormat, init};
