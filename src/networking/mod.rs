//! Networking - talking to the game authority
//!
//! - `protocol` - JSON bodies with the authority's field names
//! - `client` - [`RemoteSession`] and its HTTP implementation
//! - `driver` - tokio runtime around the session controller

pub mod client;
pub mod driver;
pub mod protocol;

pub use client::{dispatch, HttpSessionClient, RemoteSession};
pub use driver::{NullRenderer, Renderer, SessionDriver, SessionHandle};
