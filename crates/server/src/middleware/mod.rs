//! Request middleware: session layer and authorization guards.

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireLogin, RequireSuperAdmin, clear_current_user, set_current_user};
pub use session::create_session_layer;
