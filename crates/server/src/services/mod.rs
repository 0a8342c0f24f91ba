//! Business services sitting between the route handlers and the stores.

pub mod accounts;
pub mod auth;
pub mod uploads;

pub use accounts::delete_account;
pub use auth::{AuthError, authenticate, hash_password, verify_password};
pub use uploads::{MediaStore, UploadError};
