//! Route handlers and the shared error response.

pub mod auth;
mod error;
pub mod generate;
pub mod health;

pub use error::{ApiError, ErrorBody};
