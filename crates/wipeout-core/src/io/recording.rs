//! In-memory storage that records the order of operations.

use super::SyncWrite;
use std::io;
use std::io::Cursor;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;

/// One operation observed by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Seek to an absolute offset.
    Seek(u64),
    /// Write of the given number of bytes.
    Write(usize),
    /// Flush of buffered data.
    Flush,
    /// Durability barrier.
    Sync,
    /// Truncation to zero length.
    Truncate,
}

/// In-memory [`SyncWrite`] that keeps its contents and an operation log.
///
/// Optionally fails the first write issued after a given number of syncs,
/// which simulates a device error in the middle of a pass sequence.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use wipeout_core::io::RecordingSink;
/// use wipeout_core::io::StorageOp;
/// use wipeout_core::io::SyncWrite;
///
/// let mut sink = RecordingSink::new(b"data".to_vec());
/// sink.write_all(b"xx")?;
/// sink.sync()?;
/// assert_eq!(sink.ops(), &[StorageOp::Write(2), StorageOp::Sync]);
/// assert_eq!(sink.contents(), b"xxta");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    data: Cursor<Vec<u8>>,
    ops: Vec<StorageOp>,
    syncs: usize,
    fail_after_syncs: Option<usize>,
}

impl RecordingSink {
    /// Creates a sink holding `contents`, positioned at offset 0.
    #[must_use]
    pub fn new(contents: Vec<u8>) -> Self {
        Self {
            data: Cursor::new(contents),
            ..Self::default()
        }
    }

    /// Makes the first write after `syncs` completed barriers fail.
    #[must_use]
    pub fn fail_after_syncs(mut self, syncs: usize) -> Self {
        self.fail_after_syncs = Some(syncs);
        self
    }

    /// Operations in the order they were issued.
    #[must_use]
    pub fn ops(&self) -> &[StorageOp] {
        &self.ops
    }

    /// Current contents.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        self.data.get_ref()
    }
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_after_syncs == Some(self.syncs) {
            return Err(io::Error::other("simulated device failure"));
        }
        let written = self.data.write(buf)?;
        self.ops.push(StorageOp::Write(written));
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ops.push(StorageOp::Flush);
        Ok(())
    }
}

impl Seek for RecordingSink {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = self.data.seek(pos)?;
        self.ops.push(StorageOp::Seek(offset));
        Ok(offset)
    }
}

impl SyncWrite for RecordingSink {
    fn sync(&mut self) -> io::Result<()> {
        self.syncs += 1;
        self.ops.push(StorageOp::Sync);
        Ok(())
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.data.get_mut().clear();
        self.data.set_position(0);
        self.ops.push(StorageOp::Truncate);
        Ok(())
    }
}
