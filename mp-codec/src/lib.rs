//! JSON codec for model and animation definitions.
//!
//! The document shapes here are the external contract: optional fields
//! decode to documented defaults, defaults are omitted on encode, and
//! decoding never panics on malformed input (every failure is a typed
//! [`DecodeError`]).

pub mod animation;
pub mod error;
pub mod export;
pub mod layer;

pub use animation::*;
pub use error::*;
pub use export::*;
pub use layer::*;
