//! Upstream portal transport.
//!
//! - `cookies` - session cookie accumulation
//! - `session` - portal client and login handshake
//! - `payload` - authenticated listing fetch

pub mod cookies;
pub mod payload;
pub mod session;

pub use cookies::*;
pub use session::*;
