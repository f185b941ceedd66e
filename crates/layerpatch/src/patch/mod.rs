//! Patch representation, application, and inversion.

pub mod apply;
pub mod codec;
pub mod inverse;
pub mod types;

pub use apply::{apply_op, apply_patch};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use inverse::create_inverse_patch;
pub use types::{Op, Path, PatchError};
