//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the ownership policy, the post publish lifecycle and the ports
//! that infrastructure implements.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, StateConflict};
