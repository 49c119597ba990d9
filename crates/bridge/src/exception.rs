use rquickjs::{CString, Ctx, Exception, Object, Value, convert::Coerced};

use crate::error::Error;

const NO_MESSAGE: &str = "(unable to extract message)";

/// Turn a failed engine call into a diagnostic, draining the pending
/// exception from `ctx`.
///
/// Message and stack are extracted independently; losing one never blanks
/// the other.
pub fn capture<'js>(ctx: &Ctx<'js>, err: rquickjs::Error) -> Error {
    if !err.is_exception() {
        // Rejected before running, e.g. a NUL byte inside the source.
        return Error::exception(err.to_string());
    }

    let thrown = ctx.catch();
    Error::Exception {
        message: describe(ctx, &thrown),
        stack: stack_of(ctx, &thrown),
    }
}

/// Best-effort message for a thrown value.
pub fn describe<'js>(ctx: &Ctx<'js>, thrown: &Value<'js>) -> String {
    if let Some(message) = thrown
        .as_exception()
        .and_then(Exception::message)
        .filter(|message| !message.is_empty())
    {
        return message;
    }
    if let Ok(text) = coerce_string(ctx, thrown) {
        return text;
    }
    thrown
        .as_object()
        .and_then(|obj| defined_property(ctx, obj, "message"))
        .unwrap_or_else(|| NO_MESSAGE.to_string())
}

fn stack_of<'js>(ctx: &Ctx<'js>, thrown: &Value<'js>) -> Option<String> {
    defined_property(ctx, thrown.as_object()?, "stack")
}

fn defined_property<'js>(ctx: &Ctx<'js>, obj: &Object<'js>, key: &str) -> Option<String> {
    match obj.get::<_, Value<'js>>(key) {
        Ok(value) if !value.is_undefined() => coerce_string(ctx, &value).ok(),
        Ok(_) => None,
        Err(_) => {
            ctx.catch();
            None
        }
    }
}

/// JS `ToString`. On failure the pending exception is taken out of the
/// context and handed back.
pub fn coerce_string<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> Result<String, Value<'js>> {
    engine_text(value)
        .map(|text| lossy(&text))
        .map_err(|_| ctx.catch())
}

/// JS `ToString` as the engine's own bytes.
///
/// Lone surrogates come through in the engine's encoding instead of failing
/// UTF-8 validation.
pub fn engine_text<'js>(value: &Value<'js>) -> rquickjs::Result<CString<'js>> {
    let Coerced(text) = value.get::<Coerced<rquickjs::String<'js>>>()?;
    CString::from_string(text)
}

/// Decode engine bytes, replacing sequences that are not UTF-8.
pub fn lossy(text: &CString<'_>) -> String {
    String::from_utf8_lossy(text.as_str().as_bytes()).into_owned()
}
