pub mod auth;
pub mod contact;
pub mod error;
pub mod middleware;
pub mod router;
pub mod session;
pub mod timeline;
pub mod validation;

pub use auth::{AppState, AppStateInner};
pub use router::router;
