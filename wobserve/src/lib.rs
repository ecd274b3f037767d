//! Production-friendly observability hooks for tool execution.
//!
//! ```rust
//! use wobserve::{MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
//!
//! let _tool_hooks = SafeToolHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod subscriber;
mod tracing_hooks;

pub use fanout::FanoutToolHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeToolHooks;
pub use subscriber::{DEFAULT_FILTER, init_tracing};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks,
        init_tracing,
    };
}
