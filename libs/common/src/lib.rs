//! Common library for the student management service
//!
//! This crate provides the infrastructure shared by the service binaries:
//! database configuration, connection pooling, schema migration, and the
//! database error taxonomy.

pub mod database;
pub mod error;
