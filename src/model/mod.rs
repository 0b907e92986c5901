//! Pure data structures (DTOs) implementing the [`ActorEntity`](crate::framework::ActorEntity) trait.

pub mod campaign;
pub mod insight;
pub mod lenient;

pub use campaign::*;
pub use insight::*;
