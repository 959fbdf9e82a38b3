//! Persistence Module
//!
//! The boundary between the engine and whatever medium holds its snapshots.
//! The engine only sees `SnapshotAdapter`; hosts choose the `BlobStore`.

mod backend;
mod file;
mod memory;
mod snapshot;

pub use backend::BlobStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{decode, encode, LoadOutcome, Snapshot, SnapshotAdapter};
