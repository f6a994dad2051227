//! # socialhub-core
//!
//! Core crate for SocialHub. Contains configuration schemas, typed
//! identifiers, social domain events, the collaborator traits the realtime
//! hub consumes, and the unified error system.
//!
//! Depends only on `socialhub-entity` for the value types that cross the
//! collaborator traits.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
