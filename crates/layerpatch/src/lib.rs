//! Document patch engine for layer trees.
//!
//! A visual page editor holds its document as a tree of layers: nested JSON
//! objects whose child collections are arrays of nodes carrying a stable
//! `id`. This crate powers that editor's undo/redo: it diffs two snapshots of
//! such a document into a patch, derives the exact inverse of that patch, and
//! applies either against a live document without ever mutating its inputs.
//!
//! The engine is synchronous, performs no I/O, and caches nothing across
//! calls. Documents are assumed acyclic; the caller owns all document,
//! patch, and undo-stack lifetimes.
//!
//! # Undo round-trip
//!
//! ```
//! use serde_json::json;
//! use layerpatch::{apply_patch, create_inverse_patch, create_patch};
//!
//! # fn main() -> Result<(), layerpatch::PatchError> {
//! let before = json!({"children": [{"id": "hero", "tag": "div"}]});
//! let after = json!({"children": [{"id": "hero", "tag": "section"}]});
//!
//! let patch = create_patch(&before, &after);
//! let inverse = create_inverse_patch(&before, &patch);
//!
//! let next = apply_patch(&before, &patch)?;
//! assert_eq!(next, after);
//!
//! let undone = apply_patch(&next, &inverse)?;
//! assert_eq!(undone, before);
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod history;
pub mod patch;

pub use diff::{create_array_patch, create_node_patch, create_patch};
pub use history::{
    does_patch_change_state, does_patch_change_state_with, DiagnosticSink, NullSink, TracingSink,
};
pub use patch::{apply_op, apply_patch, create_inverse_patch, Op, Path, PatchError};
