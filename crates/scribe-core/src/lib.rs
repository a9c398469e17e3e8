//! # Scribe Core
//!
//! The domain layer of the Scribe content API.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the soft-delete repository contract, pagination, ownership
//! permissions and the services that orchestrate them.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod patch;
pub mod permissions;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use pagination::{DeletedFilter, Page, PageRequest};
pub use patch::Patch;
pub use permissions::{Actor, HasOwner};
