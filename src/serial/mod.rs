pub mod backoff;
pub mod fake;
pub mod sync;

pub use sync::TtyLink;

use crate::Result;

/// One end of a byte stream, as seen by the transfer loops.
///
/// Both calls move at most the slice length and may move less. `Ok(0)` means
/// the port accepted or produced nothing right now and the caller should pause
/// and retry. `Err` means the link failed hard and the transfer must stop.
pub trait ByteIo {
    /// Read whatever is available into `buf`, up to its length.
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write as much of `buf` as the port will take right now.
    fn write_some(&mut self, buf: &[u8]) -> Result<usize>;

    /// Throw away anything already queued on the receive side.
    fn discard_input(&mut self) -> Result<()>;

    /// Block until everything written has left for the wire.
    fn drain(&mut self) -> Result<()>;
}
