//! # Web Handlers
//!
//! This crate provides the request handlers, request/response types, and
//! persistence services for the campground listing application.

/// Campground CRUD handlers
mod campground_handlers;
pub use campground_handlers::*;

/// Campground persistence operations
mod campground_service;
pub use campground_service::*;

/// Campground request/response types and errors
mod campground_types;
pub use campground_types::*;

/// Page context and redirect helpers
mod context;
pub use context::*;

/// Multipart form collection
mod forms;
pub use forms::*;

/// Review handlers
mod review_handlers;
pub use review_handlers::*;

/// Review persistence operations
mod review_service;
pub use review_service::*;

/// Review request/response types and errors
mod review_types;
pub use review_types::*;

/// Registration, login, and logout handlers
mod user_handlers;
pub use user_handlers::*;

/// Shared validation rules
mod validation;
pub use validation::*;
