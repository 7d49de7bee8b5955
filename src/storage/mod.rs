//! Storage module.
//!
//! Record and device models plus the in-memory registry the dashboard
//! side keeps them in. No persistence format lives here.

pub mod codes;
pub mod models;
pub mod registry;

pub use models::*;
pub use registry::*;
