//! Runtime orchestration and lifecycle management.
//!
//! - [`DashboardSystem`] opens the database, starts one actor per table and
//!   shuts them down again.
//! - [`setup_tracing`] initializes the tracing/logging infrastructure.

pub mod system;
pub mod tracing;

pub use system::*;
pub use tracing::*;
