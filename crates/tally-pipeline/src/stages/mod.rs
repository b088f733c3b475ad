//! The three store-facing stages of a run.
//!
//! Each stage is a free function so it can be driven on its own; the
//! [`Pipeline`](crate::Pipeline) runner composes them in order.

pub mod publish;
pub mod retrieve;
pub mod transform;

pub use publish::publish;
pub use retrieve::retrieve;
pub use transform::{increment_counter, transform};
