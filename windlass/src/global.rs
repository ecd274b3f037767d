//! Process-wide default registry.
//!
//! Nothing in `wtooling` reads this instance; executors and orchestrators
//! only ever see the registry they were handed.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! assert!(Arc::ptr_eq(&windlass::default_registry(), &windlass::default_registry()));
//! ```

use std::sync::{Arc, OnceLock};

use crate::ToolRegistry;

static DEFAULT_REGISTRY: OnceLock<Arc<ToolRegistry>> = OnceLock::new();

pub fn default_registry() -> Arc<ToolRegistry> {
    Arc::clone(DEFAULT_REGISTRY.get_or_init(|| Arc::new(ToolRegistry::new())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::default_registry;
    use crate::{ToolContract, ToolHandler, ToolOutput};

    #[test]
    fn registrations_are_visible_through_every_handle() {
        let first = default_registry();
        first
            .register(
                ToolContract::new(
                    "global_probe",
                    "Registered through the default registry",
                    json!({"type": "object", "properties": {}}),
                ),
                ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from("ok"))),
                true,
            )
            .expect("registration should succeed");

        assert!(default_registry().has("global_probe"));
    }
}
