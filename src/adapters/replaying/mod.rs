//! Replaying adapters that serve recorded interactions back.

pub mod clock;
pub mod filesystem;
pub mod remote;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use remote::ReplayingTaskService;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;

/// Takes the output of the next recorded `port`/`method` call.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut replayer = replayer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    replayer.next_interaction(port, method).map(|interaction| interaction.output.clone())
}

/// Splits an `{"ok": ..}` / `{"err": ..}` output. A bare value counts as `ok`.
pub(crate) fn split_result(output: serde_json::Value) -> Result<serde_json::Value, serde_json::Value> {
    match output {
        serde_json::Value::Object(mut map) => {
            if let Some(err) = map.remove("err") {
                return Err(err);
            }
            match map.remove("ok") {
                Some(ok) => Ok(ok),
                None => Ok(serde_json::Value::Object(map)),
            }
        }
        other => Ok(other),
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::split_result;

    #[test]
    fn split_result_handles_both_conventions() {
        assert_eq!(split_result(json!({"ok": [1]})), Ok(json!([1])));
        assert_eq!(split_result(json!({"err": "boom"})), Err(json!("boom")));
        assert_eq!(split_result(json!(true)), Ok(json!(true)));
    }
}
