//! User record, column identifiers and request bodies.

pub mod requests;
pub mod user;

pub use requests::{CreateUserRequest, PatchUserRequest, ReplaceUserRequest};
pub use user::{ModelError, NewUser, User, UserColumn, Users};
