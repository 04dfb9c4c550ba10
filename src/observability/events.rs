//! Specification lifecycle events
//!
//! Every log line the crate emits names one of these events.

use std::fmt;

use super::logger::Severity;

/// Observable events in the specification lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A specification was materialized by a provider
    SpecBuilt,
    /// A builder failed its readiness check or population
    SpecBuildRejected,
    /// An identified specification was registered
    SpecRegistered,
    /// A second registration under an existing id was refused
    SpecUniquenessRejected,
    /// A composition was refused
    SpecCompositionRejected,
    /// Provider configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SpecBuilt => "SPEC_BUILT",
            Event::SpecBuildRejected => "SPEC_BUILD_REJECTED",
            Event::SpecRegistered => "SPEC_REGISTERED",
            Event::SpecUniquenessRejected => "SPEC_UNIQUENESS_REJECTED",
            Event::SpecCompositionRejected => "SPEC_COMPOSITION_REJECTED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SpecBuilt => Severity::Trace,
            Event::SpecRegistered | Event::ConfigLoaded => Severity::Info,
            Event::SpecBuildRejected
            | Event::SpecUniquenessRejected
            | Event::SpecCompositionRejected => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
