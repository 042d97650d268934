//! Stateless codecs between the authority's text formats and board types
//!
//! - [`position`] - layout string <-> square-indexed piece map
//! - [`notation`] - square pair <-> coordinate move notation

pub mod notation;
pub mod position;

pub use position::Placement;
