//! Wiring helpers that assemble a registry, executor and orchestrator.

use std::sync::Arc;

use crate::{
    ExecutorConfig, FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, ToolExecutor,
    ToolOrchestrator, ToolRegistry, ToolRuntimeHooks, TracingObservabilityHooks,
};

#[derive(Clone)]
pub struct ToolingBundle {
    pub registry: Arc<ToolRegistry>,
    pub executor: Arc<ToolExecutor>,
    pub orchestrator: Arc<ToolOrchestrator>,
}

/// Tracing and metrics hooks behind a panic guard.
pub fn observability_hooks() -> Arc<dyn ToolRuntimeHooks> {
    Arc::new(SafeToolHooks::new(
        FanoutToolHooks::new()
            .with(TracingObservabilityHooks)
            .with(MetricsObservabilityHooks),
    ))
}

pub fn build_tooling(config: ExecutorConfig) -> ToolingBundle {
    build_tooling_with(Arc::new(ToolRegistry::new()), config, observability_hooks())
}

/// Like [`build_tooling`], sized from the `WINDLASS_TOOL_*` environment
/// variables.
pub fn build_tooling_from_env() -> ToolingBundle {
    build_tooling(ExecutorConfig::from_env())
}

pub fn build_tooling_with(
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    hooks: Arc<dyn ToolRuntimeHooks>,
) -> ToolingBundle {
    let executor = Arc::new(ToolExecutor::new(config).with_hooks(hooks));
    let orchestrator = Arc::new(ToolOrchestrator::new(
        Arc::clone(&registry),
        Arc::clone(&executor),
    ));

    ToolingBundle {
        registry,
        executor,
        orchestrator,
    }
}
