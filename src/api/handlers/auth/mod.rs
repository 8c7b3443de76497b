//! Signup and login handlers.
//!
//! Neither route is a gate for anything else: the token they return is not
//! checked by any other endpoint.

pub mod login;
pub mod signup;
pub mod types;

pub use login::login;
pub use signup::signup;
