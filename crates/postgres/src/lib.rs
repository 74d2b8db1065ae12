//! # Postgres
//!
//! Connection-pool construction and schema migrations for the application database.

/// Pool creation, connectivity probe, and embedded migrations.
pub mod database;
