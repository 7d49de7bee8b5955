//! Attendance record extraction.
//!
//! Text and pattern based; the payload is never parsed into a DOM.
//!
//! - `markup` - tolerant tag scanning and entity decoding
//! - `strategies` - candidate-row producers
//! - `timestamp` - punch-time parsing cascade
//! - `normalize` - row to record conversion
//! - `extractor` - runs the strategies and collects records

pub mod extractor;
pub mod markup;
pub mod normalize;
pub mod strategies;
pub mod timestamp;

pub use extractor::*;
pub use normalize::*;
pub use strategies::*;
pub use timestamp::*;
