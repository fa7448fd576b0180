//! Request parameter normalisation and the handled-flag contract.
//!
//! Every request's params become a keyed structure before any handler sees
//! them: non-keyed values are wrapped, the method name is injected, and —
//! when a live client resolves — the method field is replaced by the client
//! id. Handlers claim a request by setting the [`HANDLED_FLAG`], which
//! suppresses the connection's fallback empty response.

use serde_json::{Map, Value};

/// Field carrying the request method name when no client is resolvable.
pub const METHOD_FIELD: &str = "method";

/// Field replacing [`METHOD_FIELD`] once a live client is resolved.
pub const CLIENT_ID_FIELD: &str = "client_id";

/// Marker a handler sets after taking ownership of a request.
pub const HANDLED_FLAG: &str = "_handled";

/// Key under which a non-keyed params value is wrapped.
pub const VALUE_FIELD: &str = "value";

/// Normalises caller params into a keyed structure carrying the method name.
///
/// `null` becomes an empty structure; any other non-keyed value is wrapped
/// under [`VALUE_FIELD`]. Existing fields, including a pre-set
/// [`HANDLED_FLAG`], are preserved.
pub(crate) fn normalize(params: Value, method: &str) -> Value {
    let mut fields = match params {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            let mut fields = Map::new();
            fields.insert(VALUE_FIELD.to_owned(), other);
            fields
        }
    };
    fields.insert(METHOD_FIELD.to_owned(), Value::String(method.to_owned()));
    Value::Object(fields)
}

/// Swaps the method field for the resolved client id.
///
/// With a live client the outgoing params identify the client instead of
/// the method; handlers relying on the method name must read it from the
/// dispatch argument, not the params.
pub(crate) fn attach_client(params: &mut Value, client_id: u32) {
    if let Value::Object(fields) = params {
        fields.remove(METHOD_FIELD);
        fields.insert(CLIENT_ID_FIELD.to_owned(), Value::from(client_id));
    }
}

/// Whether a handler has claimed this request.
#[must_use]
pub fn is_handled(params: &Value) -> bool {
    params
        .get(HANDLED_FLAG)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Claims the request, suppressing the fallback empty response.
pub fn mark_handled(params: &mut Value) {
    if let Value::Object(fields) = params {
        fields.insert(HANDLED_FLAG.to_owned(), Value::Bool(true));
    }
}
