use rquickjs::{Context, Ctx, Runtime};
use tracing::debug;

use crate::{
    TRACE_TARGET,
    config::Config,
    error::{Error, Result},
};

/// An isolated interpreter and its single global scope.
///
/// Dropping the scope releases both, so every exit path of an evaluation
/// tears the interpreter down exactly once.
pub struct Scope {
    context: Context,
    #[allow(dead_code)] // Runtime must be kept alive for the context to function
    runtime: Runtime,
}

impl Scope {
    pub fn new(config: &Config) -> Result<Self> {
        let runtime = Runtime::new().map_err(Error::RuntimeCreate)?;
        runtime.set_max_stack_size(config.max_stack_size);
        if let Some(limit) = config.memory_limit {
            runtime.set_memory_limit(limit);
        }

        let context = Context::full(&runtime).map_err(Error::ContextCreate)?;
        debug!(
            target: TRACE_TARGET,
            max_stack_size = config.max_stack_size,
            memory_limit = ?config.memory_limit,
            "created isolated runtime"
        );

        Ok(Self { context, runtime })
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Ctx<'_>) -> R,
    {
        self.context.with(f)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        debug!(target: TRACE_TARGET, "released isolated runtime");
    }
}
