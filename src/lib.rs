//! # userpatch
//!
//! User CRUD service on the `may` coroutine runtime whose PATCH endpoint
//! tells "field absent", "field null" and "field set" apart.
//!
//! - [`patch`]: the tri-state [`Optional`] and the sparse [`UpdateMapping`]
//! - [`validation`]: rule-tag validator with the presence-aware `opt` and
//!   `nonull` rules
//! - [`service`]: handlers; [`http`]: routing and the `may_minihttp` server
//! - [`store`]: in-memory and PostgreSQL storage

pub mod config;
pub mod connection;
pub mod executor;
pub mod http;
pub mod metrics;
pub mod model;
pub mod patch;
pub mod pool;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;
pub mod value_conversion;

pub use model::{PatchUserRequest, User, UserColumn};
pub use patch::{Optional, PatchError, UpdateMapping};
pub use service::{ApiError, UserService};
pub use validation::Validator;
