//! Generic actor framework for table-backed resources.
//!
//! This module provides the building blocks for serialising all access to a
//! table through one actor task, with CRUD operations, custom actions and
//! collection-level queries.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that record types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns a [`ResourceStore`]
//! - [`ResourceClient`] - Typed handle for sending requests to an actor
//! - [`FrameworkError`] / [`StoreError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;
pub mod store;

pub use core::*;
pub use store::*;
