//! Core use-case services.
//!
//! # Responsibility
//! - Expose the aggregate and its mutation operations to callers.
//! - Keep callers decoupled from slot storage details.

pub mod store;
