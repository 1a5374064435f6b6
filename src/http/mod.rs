//! HTTP surface: a pure router plus the `may_minihttp` service wrapping it.

pub mod router;
pub mod server;

pub use router::{handle, ApiResponse};
pub use server::UserHttpService;
