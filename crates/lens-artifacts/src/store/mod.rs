//! Built-in [`ObjectStore`](lens_core::ObjectStore) implementations
//!
//! - [`MemoryStore`]: objects held in a map, for tests and embedding
//! - [`FsStore`]: a directory per partition on the local filesystem
//! - [`CachedStore`]: wraps any store and caches object bodies

pub mod cached;
pub mod fs;
pub mod memory;

pub use cached::CachedStore;
pub use fs::FsStore;
pub use memory::MemoryStore;
