//! Pipeline assembly.
//!
//! [`ToolPipeline`] is the facade callers wire once at startup: it builds
//! the registry, hook chain, pooled dispatcher, session tracker, and
//! metrics from a [`PipelineSettings`] and exposes registration plus
//! `invoke`. The transport layer above it only ever sees
//! `InvocationRequest` in and `InvocationResult` out.

use crate::config::FileConfig;
use crate::dispatch::{PooledDispatcher, WorkerPool};
use crate::hooks::HookChain;
use crate::registry::ToolRegistry;
use crate::schema::generator::SchemaGenerator;
use crate::session::SessionTracker;
use crate::telemetry::InvocationMetrics;
use std::fmt;
use std::sync::Arc;
use toolgate_application::config::PipelineSettings;
use toolgate_application::use_cases::InvokeToolUseCase;
use toolgate_domain::core::error::RegistrationError;
use toolgate_domain::hook::entities::{HookRegistration, SessionRegistration};
use toolgate_domain::tool::binding::ArgumentBinder;
use toolgate_domain::tool::entities::{ToolDescriptor, ToolRecord};
use toolgate_domain::tool::value_objects::{InvocationRequest, InvocationResult};

/// Fully wired invocation pipeline.
pub struct ToolPipeline {
    registry: Arc<ToolRegistry>,
    chain: Arc<HookChain>,
    sessions: Arc<SessionTracker>,
    metrics: Arc<InvocationMetrics>,
    use_case: InvokeToolUseCase,
}

impl ToolPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        let generator = Arc::new(SchemaGenerator::new());
        let registry = Arc::new(ToolRegistry::with_generator(generator));
        let chain = Arc::new(HookChain::new(
            settings.trust_scope.clone(),
            settings.failure_policy,
        ));
        let pool = match settings.workers {
            Some(workers) => WorkerPool::new(workers),
            None => WorkerPool::with_default_capacity(),
        };
        let dispatcher = Arc::new(PooledDispatcher::new(pool));
        let sessions = Arc::new(SessionTracker::new(
            chain.clone(),
            settings.session_timeout,
        ));
        let metrics = Arc::new(InvocationMetrics::new());

        let use_case =
            InvokeToolUseCase::new(registry.clone(), chain.clone(), dispatcher)
                .with_observer(metrics.clone())
                .with_binder(ArgumentBinder::with_limits(settings.bind_limits));

        Self {
            registry,
            chain,
            sessions,
            metrics,
            use_case,
        }
    }

    /// Build from a loaded configuration file.
    pub fn from_config(config: FileConfig) -> Self {
        Self::new(config.into_settings())
    }

    pub fn with_defaults() -> Self {
        Self::new(PipelineSettings::default())
    }

    /// Register a tool, generating its input schema.
    pub fn register_tool(
        &self,
        descriptor: ToolDescriptor,
    ) -> Result<Arc<ToolRecord>, RegistrationError> {
        self.registry.register(descriptor)
    }

    /// Register a tool hook on the chain.
    pub fn register_hook(&self, registration: HookRegistration) -> Result<(), RegistrationError> {
        self.chain.register(registration)
    }

    /// Register a session lifecycle listener.
    pub fn register_session_hook(
        &self,
        registration: SessionRegistration,
    ) -> Result<(), RegistrationError> {
        self.chain.register_session(registration)
    }

    /// Run one invocation through binding, hooks, dispatch, and marshal.
    pub async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        self.use_case.invoke(request).await
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn metrics(&self) -> &InvocationMetrics {
        &self.metrics
    }
}

impl Default for ToolPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ToolPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolPipeline")
            .field("tools", &self.registry.len())
            .field("hooks", &self.chain.hook_count())
            .field("sessions", &self.sessions.active_count())
            .finish_non_exhaustive()
    }
}
