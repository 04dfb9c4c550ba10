//! # Specification Provider
//!
//! Materializes specifications of a requested concrete type from builder
//! state and enforces identity uniqueness.
//!
//! Instantiation:
//! 1. Check builder readiness
//! 2. Move builder state into a fresh base specification
//! 3. Hand the base to the target type's `SpecKind::from_spec`
//! 4. Register the id, if any; a taken id fails the build
//!
//! Providers are cheap handles. Clones share one registry, one set of
//! metrics and one configuration. Independent providers never see each
//! other's ids, which keeps tests isolated from process-wide state.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::builder::SpecificationBuilder;
use super::config::ProviderConfig;
use super::errors::{SpecResult, SpecificationError};
use super::kind::SpecKind;
use super::registry::SpecRegistry;
use super::spec::{Rule, Specification};
use crate::identity::SpecType;
use crate::invariant::{Invariant, PredicateInvariant};
use crate::observability::{Event, Logger, MetricsSnapshot, ProviderMetrics};

static GLOBAL: OnceLock<SpecificationProvider> = OnceLock::new();

struct ProviderShared {
    registry: SpecRegistry,
    metrics: ProviderMetrics,
    config: ProviderConfig,
    logger: Logger,
}

/// Handle to a registry-backed specification factory
#[derive(Clone)]
pub struct SpecificationProvider {
    shared: Arc<ProviderShared>,
}

impl Default for SpecificationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecificationProvider {
    /// Provider with default configuration and an empty registry
    pub fn new() -> Self {
        let config = ProviderConfig::default();
        let logger = config.logger();
        Self::from_valid_config(config, logger)
    }

    /// Provider with explicit configuration
    pub fn with_config(config: ProviderConfig) -> SpecResult<Self> {
        let logger = config.logger();
        Self::with_logger(config, logger)
    }

    /// Provider with explicit configuration and logger
    ///
    /// The logger replaces the one `config` would build; the logging fields
    /// of `config` are ignored.
    pub fn with_logger(config: ProviderConfig, logger: Logger) -> SpecResult<Self> {
        config.validate()?;
        let provider = Self::from_valid_config(config, logger);
        provider.shared.logger.event(
            Event::ConfigLoaded,
            &[(
                "max_compose_operands",
                &provider.shared.config.max_compose_operands.to_string(),
            )],
        );
        Ok(provider)
    }

    fn from_valid_config(config: ProviderConfig, logger: Logger) -> Self {
        Self {
            shared: Arc::new(ProviderShared {
                registry: SpecRegistry::new(),
                metrics: ProviderMetrics::new(),
                logger,
                config,
            }),
        }
    }

    /// Process-wide provider used by `Specification::of`
    pub fn global() -> &'static SpecificationProvider {
        GLOBAL.get_or_init(SpecificationProvider::new)
    }

    /// Un-identified specification from a predicate
    pub fn of<T, F>(&self, predicate: F) -> Specification<T>
    where
        T: 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Specification::detached(
            self.clone(),
            Rule::Invariant(Arc::new(PredicateInvariant::new(predicate))),
        )
    }

    /// Un-identified specification from a fallible invariant
    pub fn of_invariant<T, I>(&self, invariant: I) -> Specification<T>
    where
        T: 'static,
        I: Invariant<T> + 'static,
    {
        Specification::detached(self.clone(), Rule::Invariant(Arc::new(invariant)))
    }

    /// Empty builder for a plain specification over `T`
    pub fn builder<T: 'static>(&self) -> SpecificationBuilder<T, Specification<T>> {
        SpecificationBuilder::new(self.clone())
    }

    /// Identity registry
    pub fn registry(&self) -> &SpecRegistry {
        &self.shared.registry
    }

    /// Current counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Active configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.shared.config
    }

    /// Whether both handles share one registry
    pub fn is_same(&self, other: &SpecificationProvider) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Materialize builder state as `R`
    pub(crate) fn instantiate<R: SpecKind>(
        &self,
        builder: SpecificationBuilder<R::Subject, R>,
    ) -> SpecResult<R> {
        let spec_type = builder.spec_type();

        if let Err(err) = builder.check_readiness() {
            self.build_rejected(spec_type, &err);
            return Err(err);
        }

        let spec = match builder.into_state() {
            Ok(state) => Specification::from_state(state),
            Err(err) => {
                self.build_rejected(spec_type, &err);
                return Err(err);
            }
        };

        let kind = match R::from_spec(spec.clone()) {
            Ok(kind) => kind,
            Err(err) => {
                self.build_rejected(spec_type, &err);
                return Err(err);
            }
        };

        if spec.id().is_some() {
            let id = match self.shared.registry.register(&spec) {
                Ok(id) => id,
                Err(err) => {
                    self.shared.metrics.increment_uniqueness_rejections();
                    self.shared.logger.event(
                        Event::SpecUniquenessRejected,
                        &[("spec_type", spec_type.name()), ("error", &err.to_string())],
                    );
                    return Err(err);
                }
            };
            self.shared.metrics.increment_ids_registered();
            self.shared.logger.event(
                Event::SpecRegistered,
                &[
                    ("id", &id.to_string()),
                    ("spec_type", spec_type.name()),
                    ("subject", spec.subject().name()),
                ],
            );
        }

        self.shared.metrics.increment_specs_built();
        self.shared
            .logger
            .event(Event::SpecBuilt, &[("spec", &spec.to_string())]);
        Ok(kind)
    }

    fn build_rejected(&self, spec_type: SpecType, err: &SpecificationError) {
        self.shared.metrics.increment_builds_rejected();
        self.shared.logger.event(
            Event::SpecBuildRejected,
            &[("spec_type", spec_type.name()), ("error", &err.to_string())],
        );
    }

    pub(crate) fn composition_rejected(&self, err: &SpecificationError) {
        self.shared
            .logger
            .event(Event::SpecCompositionRejected, &[("error", &err.to_string())]);
    }
}

impl fmt::Debug for SpecificationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationProvider")
            .field("registry", &self.shared.registry)
            .field("config", &self.shared.config)
            .finish()
    }
}
