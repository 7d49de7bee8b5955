//! Pipeline orchestration module.
//!
//! Main attendance pipeline that coordinates:
//! - Login handshake
//! - Listing fetch
//! - Record extraction and date-window filtering
//! - Envelope assembly
//! - Registry-driven device sync

pub mod attendance;
pub mod context;
pub mod sync;

pub use attendance::*;
pub use context::*;
pub use sync::*;
