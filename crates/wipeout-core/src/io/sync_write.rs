//! Durable writer abstraction.

use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::Write;

/// A seekable writer that can force written bytes to stable storage.
///
/// `sync` is the durability barrier between passes: when it returns, every
/// byte written before it must have reached the device (as far as the
/// device reports). Buffered implementations must flush before syncing.
pub trait SyncWrite: Write + Seek {
    /// Flushes and forces all written data and metadata to storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Shrinks the storage to zero length.
    fn truncate(&mut self) -> io::Result<()>;
}

impl SyncWrite for File {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)
    }
}

impl<T: SyncWrite + ?Sized> SyncWrite for &mut T {
    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }

    fn truncate(&mut self) -> io::Result<()> {
        (**self).truncate()
    }
}
