//! Use cases orchestrating repositories for the HTTP layer.

pub mod errors;
pub mod modding_history;

pub use errors::{ServiceError, ServiceResult};
