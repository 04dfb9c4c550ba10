//! Observability for specification providers
//!
//! - Structured logging (JSON lines), off by default
//! - Monotonic counters per provider
//! - Typed lifecycle events
//!
//! Observability is read-only: nothing here changes how a specification
//! is built, compared or evaluated.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{render, Logger, MemorySink, Severity};
pub use metrics::{MetricsSnapshot, ProviderMetrics};
