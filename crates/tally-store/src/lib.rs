//! Object store capability for tally.
//!
//! The pipeline never talks to a concrete storage service. It talks to an
//! [`ObjectStore`]: something that can hand back a readable stream for a
//! `(container, key)` pair and accept a stream to store under one.
//!
//! # Storage Backends
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- directory tree on local disk, one subdirectory per container
//!
//! # Design Rules
//!
//! 1. `put` overwrites; the last write to a key wins.
//! 2. The store never interprets object contents.
//! 3. Backends perform no retries. A failed request is reported once.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod ack;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use ack::PutAck;
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use traits::{ObjectReader, ObjectStore};
