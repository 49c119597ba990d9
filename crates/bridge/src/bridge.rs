use std::rc::Rc;

use rquickjs::{Ctx, Value, context::EvalOptions};
use tracing::{debug, warn};

use crate::{
    TRACE_TARGET, canonical, capability,
    config::Config,
    error::{Error, Result},
    exception,
    host::Host,
    scope::Scope,
};

const SELF_TEST_SOURCE: &str = "1+1";
const SELF_TEST_EXPECTED: &str = "2";

/// Evaluates untrusted source text, one fresh interpreter per call.
pub struct Bridge<H> {
    host: Rc<H>,
    config: Config,
}

impl<H: Host> Bridge<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config(host: H, config: Config) -> Self {
        Self {
            host: Rc::new(host),
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Evaluate `source` in a new isolated context with the host
    /// capabilities installed, returning the canonical result.
    ///
    /// `None` stands for an absent source pointer and is rejected before any
    /// interpreter is created. Nothing created here survives the call.
    pub fn evaluate(&self, source: Option<&[u8]>) -> Result<String> {
        let source = source.ok_or(Error::NullInput)?;
        debug!(target: TRACE_TARGET, len = source.len(), "evaluating script");

        let outcome = Scope::new(&self.config).and_then(|scope| {
            scope.with(|ctx| {
                capability::install(&ctx, &self.host, &self.config)?;
                let code = owned_source(source)?;
                let value = eval_global(&ctx, code)?;
                canonical::canonicalize(&ctx, value)
            })
        });

        if let Err(e) = &outcome {
            warn!(target: TRACE_TARGET, status = ?e.status(), error = %e, "evaluation failed");
        }
        outcome
    }

    pub fn self_test(&self) -> Result<String> {
        self_test(&self.config)
    }
}

/// Evaluate a fixed expression end-to-end without any host capabilities.
pub fn self_test(config: &Config) -> Result<String> {
    let scope = Scope::new(config)?;
    let result = scope.with(|ctx| {
        let value = eval_global(&ctx, owned_source(SELF_TEST_SOURCE.as_bytes())?)?;
        canonical::canonicalize(&ctx, value)
    })?;

    if result != SELF_TEST_EXPECTED {
        return Err(Error::SelfTestMismatch(result));
    }
    Ok(result)
}

/// Copy the caller's bytes so the engine never reads past the declared span.
///
/// The engine wrapper makes its own NUL-terminated copy from this buffer and
/// rejects sources with an interior NUL.
fn owned_source(source: &[u8]) -> Result<Vec<u8>> {
    let mut code = Vec::new();
    code.try_reserve_exact(source.len()).map_err(|_| Error::Alloc(source.len()))?;
    code.extend_from_slice(source);
    Ok(code)
}

/// Run `code` as a sloppy-mode script against the context's existing
/// globals, so installed capabilities stay reachable.
fn eval_global<'js>(ctx: &Ctx<'js>, code: Vec<u8>) -> Result<Value<'js>> {
    let mut options = EvalOptions::default();
    options.global = true;
    options.strict = false;
    ctx.eval_with_options(code, options)
        .map_err(|e| exception::capture(ctx, e))
}
