//! # Scribe Shared
//!
//! Request and response types of the HTTP API, with their validation rules.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ErrorResponse, MessageResponse, PaginatedResponse};
