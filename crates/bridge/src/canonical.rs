use rquickjs::{CString, Ctx, Object, Value};

use crate::{
    error::{Error, Result},
    exception::{coerce_string, describe, lossy},
};

/// Guest value kinds the canonical form distinguishes.
enum Kind<'js> {
    Undefined,
    Null,
    Bool(bool),
    Number(Value<'js>),
    String(rquickjs::String<'js>),
    Object(Object<'js>),
    /// Symbols, big integers and anything the engine adds later.
    Other(Value<'js>),
}

impl<'js> Kind<'js> {
    fn of(value: Value<'js>) -> Self {
        if value.is_undefined() {
            return Self::Undefined;
        }
        if value.is_null() {
            return Self::Null;
        }
        if let Some(b) = value.as_bool() {
            return Self::Bool(b);
        }
        if value.is_number() {
            return Self::Number(value);
        }
        let value = match value.try_into_string() {
            Ok(s) => return Self::String(s),
            Err(value) => value,
        };
        match value.try_into_object() {
            Ok(obj) => Self::Object(obj),
            Err(value) => Self::Other(value),
        }
    }
}

/// Render the final value of an evaluation as text.
///
/// Primitives use their string form, objects and arrays their JSON form.
pub fn canonicalize<'js>(ctx: &Ctx<'js>, value: Value<'js>) -> Result<String> {
    match Kind::of(value) {
        Kind::Undefined => Ok("undefined".to_string()),
        Kind::Null => Ok("null".to_string()),
        Kind::Bool(b) => Ok(b.to_string()),
        Kind::String(s) => CString::from_string(s)
            .map(|text| lossy(&text))
            .map_err(|e| Error::ResultConvert(format!("Failed to convert value to string: {e}"))),
        Kind::Number(value) | Kind::Other(value) => {
            stringify(ctx, &value, "Failed to convert value to string")
        }
        Kind::Object(obj) => serialize(ctx, obj),
    }
}

fn serialize<'js>(ctx: &Ctx<'js>, obj: Object<'js>) -> Result<String> {
    match ctx.json_stringify(obj.clone()) {
        Ok(Some(json)) => CString::from_string(json)
            .map(|text| lossy(&text))
            .map_err(|e| {
                Error::ResultConvert(format!("Failed to convert JSON result to string: {e}"))
            }),
        // Functions and other values JSON has no form for.
        Ok(None) => Ok("undefined".to_string()),
        Err(_) => {
            // Cycles, throwing toJSON, BigInt members: fall back to ToString.
            ctx.catch();
            stringify(ctx, &obj.into_value(), "Failed to convert object to string")
        }
    }
}

fn stringify<'js>(ctx: &Ctx<'js>, value: &Value<'js>, what: &str) -> Result<String> {
    coerce_string(ctx, value)
        .map_err(|thrown| Error::ResultConvert(format!("{what}: {}", describe(ctx, &thrown))))
}
