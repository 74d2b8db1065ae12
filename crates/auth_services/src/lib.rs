//! # Auth Services
//!
//! This crate provides user accounts and login state for the application:
//! password hashing and verification, the cookie-session login guard, and the
//! session-scoped flash message helpers.

/// One-time, session-scoped flash messages.
pub mod flash;
/// Middleware guarding login-only routes and the current-user extractor.
pub mod middleware;
/// Service definitions for user management and credential verification.
pub mod service;
/// Session helpers: login state and the return-to path.
pub mod session;
/// Types and structures used in authentication services.
pub mod types;
