//! Security module.
//!
//! Keeps portal session cookies and device passwords out of log output.

pub mod redact;

pub use redact::*;
