use std::collections::VecDeque;

use crate::{Error, Result};

use super::ByteIo;

/// One scripted outcome for a `read_some` call.
pub enum ReadStep {
    /// Hand over these bytes, split across calls if the buffer is smaller.
    Data(Vec<u8>),
    /// Produce nothing this time, like a poll timeout.
    Stall,
    /// Fail the call hard.
    Fail(Error),
}

/// One scripted outcome for a `write_some` call.
pub enum WriteStep {
    /// Accept at most this many bytes of the offered slice.
    Accept(usize),
    /// Accept nothing this time.
    Stall,
    /// Fail the call hard.
    Fail(Error),
}

/// Scripted in-memory link used in tests to drive the transfer loops.
///
/// Reads and writes each follow their own script. An exhausted write script
/// falls back to accepting everything, an exhausted read script keeps
/// reporting no data. All accepted bytes are recorded in arrival order.
#[derive(Default)]
pub struct FakeLink {
    reads: VecDeque<ReadStep>,
    writes: VecDeque<WriteStep>,
    written: Vec<u8>,
    io_calls: usize,
    discards: usize,
    drains: usize,
}

impl FakeLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reads(steps: Vec<ReadStep>) -> Self {
        Self {
            reads: steps.into(),
            ..Self::default()
        }
    }

    pub fn with_writes(steps: Vec<WriteStep>) -> Self {
        Self {
            writes: steps.into(),
            ..Self::default()
        }
    }

    pub fn queue_read(&mut self, step: ReadStep) {
        self.reads.push_back(step);
    }

    pub fn queue_write(&mut self, step: WriteStep) {
        self.writes.push_back(step);
    }

    /// Everything the link has accepted so far, in arrival order.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn io_calls(&self) -> usize {
        self.io_calls
    }

    pub fn discards(&self) -> usize {
        self.discards
    }

    pub fn drains(&self) -> usize {
        self.drains
    }
}

impl ByteIo for FakeLink {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.io_calls += 1;
        match self.reads.pop_front() {
            Some(ReadStep::Data(mut bytes)) => {
                if bytes.len() > buf.len() {
                    let rest = bytes.split_off(buf.len());
                    self.reads.push_front(ReadStep::Data(rest));
                }
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Some(ReadStep::Stall) | None => Ok(0),
            Some(ReadStep::Fail(err)) => Err(err),
        }
    }

    fn write_some(&mut self, buf: &[u8]) -> Result<usize> {
        self.io_calls += 1;
        match self.writes.pop_front() {
            Some(WriteStep::Accept(limit)) => {
                let taken = limit.min(buf.len());
                self.written.extend_from_slice(&buf[..taken]);
                Ok(taken)
            }
            Some(WriteStep::Stall) => Ok(0),
            Some(WriteStep::Fail(err)) => Err(err),
            None => {
                self.written.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn discard_input(&mut self) -> Result<()> {
        self.discards += 1;
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        self.drains += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_read_step_spans_multiple_calls() {
        let mut fake = FakeLink::with_reads(vec![ReadStep::Data(vec![1, 2, 3, 4, 5])]);
        let mut buf = [0u8; 3];
        assert_eq!(fake.read_some(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(fake.read_some(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        // Script exhausted, behaves like a quiet port.
        assert_eq!(fake.read_some(&mut buf).unwrap(), 0);
    }

    #[test]
    fn write_script_limits_then_defaults_to_accept_all() {
        let mut fake = FakeLink::with_writes(vec![WriteStep::Accept(2), WriteStep::Stall]);
        assert_eq!(fake.write_some(b"abcd").unwrap(), 2);
        assert_eq!(fake.write_some(b"cd").unwrap(), 0);
        assert_eq!(fake.write_some(b"cd").unwrap(), 2);
        assert_eq!(fake.written(), b"abcd");
        assert_eq!(fake.io_calls(), 3);
    }

    #[test]
    fn scripted_failures_surface_as_errors() {
        let mut fake = FakeLink::with_reads(vec![ReadStep::Fail(Error::Io(
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"),
        ))]);
        let mut buf = [0u8; 8];
        assert!(fake.read_some(&mut buf).is_err());
    }
}
