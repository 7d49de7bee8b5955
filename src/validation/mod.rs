//! Record validation.
//!
//! - `row` - employee-code gates for candidate rows
//! - `window` - inclusive date-window filtering

pub mod row;
pub mod window;

pub use row::*;
pub use window::*;
