//! # Image Storage
//!
//! Object storage for campground images. The S3-backed store is used in
//! production; the in-memory store backs unit tests.

/// The store trait, the S3 implementation, and the in-memory test double.
mod store;
pub use store::*;
