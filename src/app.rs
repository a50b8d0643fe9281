use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::cancel::CancelFlag;
use crate::cli::TransferOptions;
use crate::config::{BaudRate, Direction};
use crate::serial::backoff::RetryPacer;
use crate::serial::{ByteIo, TtyLink};
use crate::state::{TransferState, TransferSummary};
use crate::transfer;
use crate::{Error, Result};

/// Settled configuration for one transfer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub direction: Direction,
    pub device: String,
    pub baud: BaudRate,
    pub file: PathBuf,
    pub byte_count: u64,
    pub max_stalls: Option<u32>,
}

impl AppConfig {
    pub fn from_options(opts: TransferOptions) -> Self {
        Self {
            direction: opts.direction,
            device: opts.device,
            baud: opts.baud,
            file: opts.file,
            byte_count: opts.byte_count,
            max_stalls: opts.max_stalls,
        }
    }
}

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn from_options(opts: TransferOptions) -> Self {
        Self::new(AppConfig::from_options(opts))
    }

    /// Open the device and run the configured transfer, stopping early on
    /// SIGINT or SIGTERM.
    pub fn run(&self) -> Result<TransferSummary> {
        let cancel = CancelFlag::new();
        cancel.install()?;
        self.run_with_cancel(&cancel)
    }

    pub fn run_with_cancel(&self, cancel: &CancelFlag) -> Result<TransferSummary> {
        let mut link = TtyLink::open(&self.config.device, self.config.baud)?;
        self.run_on_link(&mut link, cancel)
    }

    /// Run the transfer over any link. Tests drive this with scripted and
    /// pseudoterminal links.
    pub fn run_on_link<L: ByteIo>(
        &self,
        link: &mut L,
        cancel: &CancelFlag,
    ) -> Result<TransferSummary> {
        match self.config.direction {
            Direction::Send => self.send(link, cancel),
            Direction::Receive => self.receive(link, cancel),
        }
    }

    fn send<L: ByteIo>(&self, link: &mut L, cancel: &CancelFlag) -> Result<TransferSummary> {
        let file = File::open(&self.config.file).map_err(|e| Error::Open {
            target: self.config.file.display().to_string(),
            source: e,
        })?;
        // A requested count of zero means the whole file.
        let total = if self.config.byte_count > 0 {
            self.config.byte_count
        } else {
            file.metadata()?.len()
        };
        println!(
            "Will now send {total} bytes from file {} on port {}",
            self.config.file.display(),
            self.config.device
        );

        let mut source = BufReader::new(file);
        let mut state = TransferState::new(total);
        let mut pacer = RetryPacer::new(self.config.max_stalls);
        transfer::run_send(link, &mut source, &mut state, &mut pacer, cancel)?;

        let summary = state.finish();
        println!(
            "Sent {} bytes - Finished (crc32 0x{:08x})",
            summary.completed, summary.crc32
        );
        Ok(summary)
    }

    fn receive<L: ByteIo>(&self, link: &mut L, cancel: &CancelFlag) -> Result<TransferSummary> {
        let mut sink = File::create(&self.config.file).map_err(|e| Error::Open {
            target: self.config.file.display().to_string(),
            source: e,
        })?;
        let total = self.config.byte_count;
        println!(
            "Will now receive {total} bytes to file {} on port {}",
            self.config.file.display(),
            self.config.device
        );

        let mut state = TransferState::new(total);
        let mut pacer = RetryPacer::new(self.config.max_stalls);
        transfer::run_receive(link, &mut sink, &mut state, &mut pacer, cancel)?;

        let summary = state.finish();
        println!(
            "Received {} bytes - Finished (crc32 0x{:08x})",
            summary.completed, summary.crc32
        );
        Ok(summary)
    }
}
