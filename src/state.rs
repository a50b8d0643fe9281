use crc32fast::Hasher;

/// Progress ledger for one transfer.
///
/// Counts every byte the moment the operating system confirms it moved, so an
/// aborted run still reports exactly how far it got. A running CRC32 over the
/// same bytes lets the two ends of a link compare what actually crossed.
pub struct TransferState {
    requested: u64,
    completed: u64,
    hasher: Hasher,
}

impl TransferState {
    pub fn new(requested: u64) -> Self {
        Self {
            requested,
            completed: 0,
            hasher: Hasher::new(),
        }
    }

    /// Record bytes confirmed by a single port call.
    pub fn record(&mut self, bytes: &[u8]) {
        debug_assert!(
            self.completed + bytes.len() as u64 <= self.requested,
            "recorded past the requested total"
        );
        self.completed += bytes.len() as u64;
        self.hasher.update(bytes);
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn remaining(&self) -> u64 {
        self.requested - self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.requested
    }

    /// Size of the next chunk, never more than `max` or what is left.
    pub fn next_chunk(&self, max: usize) -> usize {
        self.remaining().min(max as u64) as usize
    }

    pub fn finish(self) -> TransferSummary {
        TransferSummary {
            requested: self.requested,
            completed: self.completed,
            crc32: self.hasher.finalize(),
        }
    }
}

/// Final tally of a transfer, complete or aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub requested: u64,
    pub completed: u64,
    pub crc32: u32,
}
