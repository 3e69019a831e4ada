//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, media storage, and caching.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`media`] - Media host client for avatar uploads
//! - [`memory`] - In-process repositories
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod media;
pub mod memory;
pub mod persistence;
