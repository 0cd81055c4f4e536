pub mod auth;
pub mod display;

pub use auth::{AuthService, Claims};
pub use display::{DisplayService, FooterLink};
