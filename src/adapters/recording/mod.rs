//! Recording adapters that capture interactions to cassettes.

pub mod issues;
pub mod scm;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Records a `Result` interaction as `{"ok": value}` or `{"err": error}`.
///
/// The error is stored in its serialised form so replay can rebuild it;
/// see `replaying::replay_result`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or_default();
    let output_json = match result {
        Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or_default() }),
        Err(e) => serde_json::json!({ "err": serde_json::to_value(e).unwrap_or_default() }),
    };

    recorder
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .record(port, method, input_json, output_json);
}
