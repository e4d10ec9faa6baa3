//! Observability for the agent schema tooling
//!
//! Structured logging only; the schema layer emits `tracing` events and the
//! binary installs the subscriber.

pub mod logging;

pub use logging::{init_default_logging, init_from_config, init_logging, LogFormat, LogSettings};

pub use logging::payload_span;
