//! Tri-state partial updates.
//!
//! - [`Optional`]: per-field "unset / null / value" container with JSON decoding
//! - [`UpdateMapping`]: the sparse column change-set built from a request
//! - [`PatchRequest`]: implemented by request types that produce a mapping

pub mod error;
pub mod optional;
pub mod update;

pub use error::PatchError;
pub use optional::{Optional, OptionalAny};
pub use update::{Assignment, PatchColumn, PatchRequest, UpdateMapping};
