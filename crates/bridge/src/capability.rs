use std::rc::Rc;

use rquickjs::{Ctx, Exception, Function, Object, Value, function::Opt};
use tracing::debug;

use crate::{
    TRACE_TARGET,
    config::Config,
    error::{Error, Result},
    exception::engine_text,
    host::Host,
};

/// Install the logging function and the host call-out into the context's
/// global scope.
///
/// Any failure aborts the whole installation; the caller discards the
/// context, so no partial capability set is ever observable.
pub fn install<H: Host>(ctx: &Ctx<'_>, host: &Rc<H>, config: &Config) -> Result<()> {
    let console = namespace(ctx, &config.log_namespace)
        .map_err(|_| Error::BridgeInstall("Failed to create console object"))?;
    let log = log_function(ctx, Rc::clone(host))
        .map_err(|_| Error::BridgeInstall("Failed to create console.log function"))?;
    console
        .set("log", log)
        .map_err(|_| Error::BridgeInstall("Failed to install console.log"))?;

    let host_obj = namespace(ctx, &config.host_namespace)
        .map_err(|_| Error::BridgeInstall("Failed to create host object"))?;
    let bridge = call_function(ctx, Rc::clone(host), config.response_capacity)
        .map_err(|_| Error::BridgeInstall("Failed to create bridge function"))?;
    host_obj
        .set(config.host_call_name.as_str(), bridge)
        .map_err(|_| Error::BridgeInstall("Failed to install bridge function"))?;

    Ok(())
}

/// Fetch the global object `name`, creating it when absent.
fn namespace<'js>(ctx: &Ctx<'js>, name: &str) -> rquickjs::Result<Object<'js>> {
    let globals = ctx.globals();
    if let Ok(existing) = globals.get::<_, Object<'js>>(name) {
        return Ok(existing);
    }
    let obj = Object::new(ctx.clone())?;
    globals.set(name, obj.clone())?;
    Ok(obj)
}

fn log_function<'js, H: Host>(ctx: &Ctx<'js>, host: Rc<H>) -> rquickjs::Result<Function<'js>> {
    Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, message: Opt<Value<'js>>| -> rquickjs::Result<()> {
            let message = message.0.unwrap_or_else(|| Value::new_undefined(ctx.clone()));
            let text = engine_text(&message)?;
            host.log(text.as_str().as_bytes());
            Ok(())
        },
    )?
    .with_name("log")
}

// JS signature: bridge(payload: string): string | null
fn call_function<'js, H: Host>(
    ctx: &Ctx<'js>,
    host: Rc<H>,
    capacity: usize,
) -> rquickjs::Result<Function<'js>> {
    Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, payload: Opt<Value<'js>>| -> rquickjs::Result<Value<'js>> {
            let Some(payload) = payload.0 else {
                return Err(Exception::throw_type(
                    &ctx,
                    "bridge requires 1 argument (JSON string)",
                ));
            };
            let Ok(payload) = engine_text(&payload) else {
                ctx.catch();
                return Err(Exception::throw_type(&ctx, "bridge argument must be a string"));
            };

            let mut response = vec![0u8; capacity];
            let code = host.call(payload.as_str().as_bytes(), &mut response);
            let Ok(written) = usize::try_from(code) else {
                debug!(target: TRACE_TARGET, code, "host call failed");
                return Err(Exception::throw_internal(
                    &ctx,
                    &format!("Host call failed with error code {code}"),
                ));
            };
            if written > capacity {
                debug!(target: TRACE_TARGET, written, capacity, "host response overflow");
                return Err(Exception::throw_internal(
                    &ctx,
                    &format!("Host response of {written} bytes exceeds capacity of {capacity} bytes"),
                ));
            }
            if written == 0 {
                return Ok(Value::new_null(ctx));
            }

            let text = String::from_utf8_lossy(&response[..written]);
            rquickjs::String::from_str(ctx, &text).map(rquickjs::String::into_value)
        },
    )?
    .with_name("bridge")
}
