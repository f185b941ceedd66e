//! Structural equality and deep clone over `serde_json::Value`.
//!
//! Both operations walk the value tree explicitly; nothing here serializes or
//! re-parses. Documents are assumed acyclic.

pub mod clone;
pub mod deep_equal;

pub use clone::clone;
pub use deep_equal::deep_equal;
