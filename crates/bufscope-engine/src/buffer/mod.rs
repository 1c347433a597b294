//! Captured buffers and the versions the preview draws from.
//!
//! A buffer's content changes over a capture; a [`BufferVersion`] pins one
//! point of that history together with the vertex layout that applied then.

mod captured;
mod source;

pub use captured::{CapturedBuffer, Upload};
pub use source::{BufferSource, BufferVersion, SourceId};
