//! Data layer
//!
//! Typed entities for every backend response the client consumes.
//! Responses are parsed at the gateway boundary; nothing untyped
//! crosses into the services.

mod models;

pub use models::*;
