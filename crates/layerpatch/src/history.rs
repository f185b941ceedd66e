//! Undo-history support: deciding whether a patch is worth recording.
//!
//! The undo stack itself belongs to the caller; the engine only answers
//! whether applying a patch would change anything, so no-op entries never
//! pollute the history.

use serde_json::Value;

use layerpatch_util::deep_equal;

use crate::patch::apply::apply_patch;
use crate::patch::types::{Op, PatchError};

/// Receiver for apply failures swallowed by the significance check.
///
/// The engine itself stays side-effect free; the sink decides what to do
/// with the diagnostic.
pub trait DiagnosticSink {
    fn patch_apply_failed(&self, error: &PatchError);
}

/// Default sink: logs swallowed failures at `warn`.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn patch_apply_failed(&self, error: &PatchError) {
        tracing::warn!(%error, "patch did not apply; treating as no-op");
    }
}

/// Sink that discards diagnostics.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn patch_apply_failed(&self, _error: &PatchError) {}
}

/// Returns `true` if applying `patch` to `original` would change it.
///
/// An empty patch is trivially insignificant. A patch that fails to apply
/// (for example, it references a node removed by an earlier edit) is reported
/// to the default sink and counted as "no change" rather than propagated, so
/// a stale patch can never corrupt an undo stack.
pub fn does_patch_change_state(original: &Value, patch: &[Op]) -> bool {
    does_patch_change_state_with(original, patch, &TracingSink)
}

/// [`does_patch_change_state`] with an explicit diagnostic sink.
pub fn does_patch_change_state_with(
    original: &Value,
    patch: &[Op],
    sink: &dyn DiagnosticSink,
) -> bool {
    if patch.is_empty() {
        return false;
    }
    match apply_patch(original, patch) {
        Ok(next) => !deep_equal(original, &next),
        Err(error) => {
            sink.patch_apply_failed(&error);
            false
        }
    }
}
