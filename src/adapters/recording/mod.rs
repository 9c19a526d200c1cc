//! Recording adapters that capture port interactions to cassettes.
//!
//! Each adapter delegates to an inner implementation and records the call.
//! Results are stored as `{"ok": value}` or `{"err": error}`.

pub mod clock;
pub mod filesystem;
pub mod remote;

use serde::Serialize;

use crate::cassette::session::SharedRecorder;

/// Records a call with a plain (non-`Result`) return value.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output = serde_json::to_value(output).unwrap_or(serde_json::Value::Null);
    push(recorder, port, method, input, output);
}

/// Records a call returning a `Result`, with the error stored as its message.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or(serde_json::Value::Null) }),
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };
    push(recorder, port, method, input, output);
}

/// Records a call returning a `Result` whose error is itself serializable,
/// so replay can reproduce the exact error.
pub(crate) fn record_typed_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or(serde_json::Value::Null) }),
        Err(e) => serde_json::json!({ "err": serde_json::to_value(e).unwrap_or(serde_json::Value::Null) }),
    };
    push(recorder, port, method, input, output);
}

fn push(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    let mut guard = recorder.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.record(port, method, input, output);
}
