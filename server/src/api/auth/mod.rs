//! Authentication module

mod extractors;
pub mod jwt;
mod manager;

pub use extractors::{AdminUser, AuthUser};
pub use jwt::Claims;
pub use manager::{AdminCheck, AuthManager};
