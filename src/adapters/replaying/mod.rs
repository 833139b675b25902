//! Replaying adapters that serve recorded interactions.

pub mod issues;
pub mod scm;

pub use issues::ReplayingIssueTracker;
pub use scm::ReplayingChangeSupplier;

use serde::de::DeserializeOwned;

/// Rebuilds a recorded `{"ok": ..}` / `{"err": ..}` output.
///
/// The outer `Result` fails only when the cassette itself is malformed.
pub(crate) fn replay_result<T, E>(
    output: &serde_json::Value,
    context: &str,
) -> Result<Result<T, E>, String>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    let parse_err = |e: serde_json::Error| format!("{context}: malformed cassette output: {e}");
    if let Some(err) = output.get("err") {
        return serde_json::from_value(err.clone()).map(Err).map_err(parse_err);
    }
    let value = output.get("ok").ok_or_else(|| format!("{context}: output has neither ok nor err"))?;
    serde_json::from_value(value.clone()).map(Ok).map_err(parse_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_ok_and_err() {
        let ok: Result<u32, String> = replay_result(&json!({"ok": 3}), "t").unwrap();
        assert_eq!(ok, Ok(3));
        let err: Result<u32, String> = replay_result(&json!({"err": "boom"}), "t").unwrap();
        assert_eq!(err, Err("boom".into()));
    }

    #[test]
    fn malformed_output_is_reported() {
        let bad = replay_result::<u32, String>(&json!({"value": 3}), "issues::get_issue");
        assert!(bad.unwrap_err().starts_with("issues::get_issue"));
    }
}
