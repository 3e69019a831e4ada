//! Domain layer containing business entities and contracts.
//!
//! Defines entities, repository interfaces, and the media host interface,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`media`] - External image storage contract
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Business rules live in services (see [`crate::application::services`])

pub mod entities;
pub mod media;
pub mod repositories;
