//! Vertex layout decoding for captured array buffers.
//!
//! The crate answers three questions about a captured buffer:
//! - how wide one interleaved vertex record is ([`infer_stride`])
//! - what one attribute looks like across every record ([`extract`])
//! - where the decoded positions live in space ([`bounds`])
//!
//! Everything here is pure CPU work over byte slices. GPU upload and drawing
//! live in `bufscope-engine`.

mod bounds;
mod error;
mod layout;
mod reader;
mod types;

pub use bounds::{bounds, BoundingBox};
pub use error::LayoutError;
pub use layout::{infer_stride, validate};
pub use reader::{extract, record_count};
pub use types::{AttributeDescriptor, ComponentType};
