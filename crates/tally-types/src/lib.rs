//! Foundation types for tally.
//!
//! Every other tally crate depends on `tally-types`. The identifiers here
//! carry only the invariant the pipeline relies on (non-emptiness); anything
//! else about a key's shape is the store backend's business.
//!
//! # Key Types
//!
//! - [`ContainerId`] — names a remote container (a "bucket")
//! - [`ObjectKey`] — slash-delimited key naming an object inside a container

pub mod error;
pub mod ident;

pub use error::TypeError;
pub use ident::{ContainerId, ObjectKey};
