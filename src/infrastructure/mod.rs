//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, data paths and wiring.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for the preference cache
//! - [`config`] - Configuration loading and validation
//! - [`paths`] - Data directory layout

pub mod bootstrap;
pub mod config;
pub mod paths;
