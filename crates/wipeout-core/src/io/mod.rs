//! Storage seam for the overwrite pass loop.
//!
//! The engine never talks to `std::fs::File` directly while writing passes;
//! it goes through [`SyncWrite`], which adds the durability barrier and the
//! final truncation to `Write + Seek`. [`RecordingSink`] is an in-memory
//! implementation that logs every operation, used to check pass ordering.

pub mod recording;
pub mod sync_write;

pub use recording::RecordingSink;
pub use recording::StorageOp;
pub use sync_write::SyncWrite;
