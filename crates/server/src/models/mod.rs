//! Domain types for the server.

pub mod account;
pub mod flash;

pub use account::{Account, Contact, CurrentUser, NewAccount, Page, session_keys};
pub use flash::{FieldError, Flash};
