use std::io::{self, Read, Write};

use crate::cancel::CancelFlag;
use crate::serial::backoff::RetryPacer;
use crate::serial::ByteIo;
use crate::state::TransferState;
use crate::{Error, Result};

/// Largest slice handed to the port in one call.
pub const CHUNK_SIZE: usize = 255;

/// Push one chunk out the link, tolerating short writes.
///
/// Keeps offering the unsent tail until the whole chunk is accepted. A call
/// that accepts nothing goes through the pacer, a failed call aborts with the
/// progress so far already recorded. An empty chunk never touches the port.
pub fn send_bytes<L: ByteIo>(
    link: &mut L,
    chunk: &[u8],
    state: &mut TransferState,
    pacer: &mut RetryPacer,
    cancel: &CancelFlag,
) -> Result<()> {
    let mut sent = 0;
    while sent < chunk.len() {
        if cancel.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let n = link.write_some(&chunk[sent..])?;
        if n == 0 {
            pacer.stall()?;
            continue;
        }
        state.record(&chunk[sent..sent + n]);
        pacer.mark_progress();
        sent += n;
    }
    Ok(())
}

/// Pull one chunk off the link, tolerating short reads.
///
/// Every slice the port produces is appended to `out` immediately, so an
/// aborted transfer leaves exactly the received bytes behind, never padding.
/// An empty chunk never touches the port.
pub fn receive_bytes<L: ByteIo, W: Write>(
    link: &mut L,
    out: &mut W,
    chunk: &mut [u8],
    state: &mut TransferState,
    pacer: &mut RetryPacer,
    cancel: &CancelFlag,
) -> Result<()> {
    let mut got = 0;
    while got < chunk.len() {
        if cancel.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let n = link.read_some(&mut chunk[got..])?;
        if n == 0 {
            pacer.stall()?;
            continue;
        }
        out.write_all(&chunk[got..got + n])?;
        state.record(&chunk[got..got + n]);
        pacer.mark_progress();
        got += n;
    }
    Ok(())
}

/// Send `state.requested()` bytes from `source` over the link, then drain.
///
/// The file is read a whole chunk at a time. If it runs out before the
/// requested count the transfer aborts, it never pads or repeats.
pub fn run_send<L, R>(
    link: &mut L,
    source: &mut R,
    state: &mut TransferState,
    pacer: &mut RetryPacer,
    cancel: &CancelFlag,
) -> Result<()>
where
    L: ByteIo,
    R: Read,
{
    let mut chunk = [0u8; CHUNK_SIZE];
    while !state.is_complete() {
        let want = state.next_chunk(CHUNK_SIZE);
        fill_chunk(source, &mut chunk[..want], state)?;
        send_bytes(link, &chunk[..want], state, pacer, cancel)?;
        log::debug!(
            "sent chunk of {want}, {}/{} bytes",
            state.completed(),
            state.requested()
        );
    }
    // Wait for the driver to push the tail onto the wire before reporting.
    link.drain()
}

/// Receive `state.requested()` bytes from the link into `sink`.
pub fn run_receive<L, W>(
    link: &mut L,
    sink: &mut W,
    state: &mut TransferState,
    pacer: &mut RetryPacer,
    cancel: &CancelFlag,
) -> Result<()>
where
    L: ByteIo,
    W: Write,
{
    let mut chunk = [0u8; CHUNK_SIZE];
    while !state.is_complete() {
        let want = state.next_chunk(CHUNK_SIZE);
        receive_bytes(link, sink, &mut chunk[..want], state, pacer, cancel)?;
        log::debug!(
            "received chunk of {want}, {}/{} bytes",
            state.completed(),
            state.requested()
        );
    }
    sink.flush()?;
    Ok(())
}

/// Read exactly `chunk.len()` bytes from the source file.
fn fill_chunk<R: Read>(source: &mut R, chunk: &mut [u8], state: &TransferState) -> Result<()> {
    let mut filled = 0;
    while filled < chunk.len() {
        match source.read(&mut chunk[filled..]) {
            Ok(0) => {
                return Err(Error::Truncated {
                    wanted: state.requested(),
                    got: state.completed() + filled as u64,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(())
}
