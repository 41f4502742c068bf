//! Core data model for layered entity model definitions.
//!
//! Key constraints for this project:
//! - Definitions are plain owned data; no engine types leak in here.
//! - A definition root never carries cubes or a pose of its own.
//! - Baked parts are a consumer-side, single-threaded convenience; the
//!   shared registry only ever holds definitions.

pub mod animation;
pub mod baked;
pub mod key;
pub mod part;
pub mod types;

pub use animation::*;
pub use baked::*;
pub use key::*;
pub use part::*;
pub use types::*;
